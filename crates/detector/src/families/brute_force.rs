use crate::common::{event_ids_for, AlertIdGen};
use crate::rule::Rule;
use crate::window::first_window_trigger;
use sentinel_core::{Alert, Event, PolicyModifiers};
use std::collections::BTreeMap;

/// RULE-BF-*: brute-force credential attacks. Partitions `auth_failure`
/// events by (ip, source); one alert per partition per run.
pub fn detect(rule: &Rule, events: &[Event], modifiers: &PolicyModifiers, ids: &mut AlertIdGen) -> Vec<Alert> {
    let m = modifiers.get(rule.threat_type);
    let (window, threshold) = rule.effective_window_and_threshold(m.window_multiplier, m.threshold_multiplier);

    let mut partitions: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, e) in events.iter().enumerate() {
        if e.event.as_str() != "auth_failure" {
            continue;
        }
        partitions.entry((e.ip.clone(), e.source.clone())).or_default().push(idx);
    }

    let mut alerts = Vec::new();
    for ((ip, source), idxs) in partitions {
        let local: Vec<(usize, i64)> = idxs.iter().enumerate().map(|(pos, &gi)| (pos, events[gi].ts)).collect();
        let Some(fired) = first_window_trigger(&local, window, threshold) else { continue };
        let member_idxs: Vec<usize> = fired.iter().map(|&pos| idxs[pos]).collect();
        let members: Vec<&Event> = member_idxs.iter().map(|&i| &events[i]).collect();
        let first = members[0];
        alerts.push(Alert {
            alert_id: ids.next_id(),
            rule_id: rule.id.clone(),
            threat_type: rule.threat_type.to_string(),
            severity: rule.severity,
            confidence: rule.confidence,
            timestamp: first.timestamp.clone(),
            ts: first.ts,
            component: first.component.clone(),
            source: source.clone(),
            description: format!(
                "brute-force credential attack from {ip} against {source}: {} failures within {window}s",
                members.len()
            ),
            event_count: members.len(),
            event_ids: event_ids_for(&members),
            response_hint: rule.response_hint.clone(),
        });
    }
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleConfig;

    fn make_rule(window_sec: u64, threshold: u64) -> Rule {
        let cfg: RuleConfig = serde_yaml::from_str(&format!(
            "id: RULE-BF-001\nthreat_type: credential_attack\nwindow_sec: {window_sec}\nthreshold: {threshold}\nseverity: high\nconfidence: 0.8\n"
        ))
        .unwrap();
        Rule::from_config(cfg).unwrap()
    }

    fn auth_failure_event(i: i64) -> Event {
        Event::from_fields(
            sentinel_core::format_instant(1_700_000_000 + i * 3),
            "api-gw-01",
            "api",
            "auth_failure",
            "",
            "10.0.0.99",
            "",
            "",
            "",
            "low",
            "",
            "",
        )
        .unwrap()
    }

    #[test]
    fn fires_one_alert_for_ten_rapid_failures() {
        let rule = make_rule(60, 5);
        let events: Vec<Event> = (0..10).map(auth_failure_event).collect();
        let mut ids = AlertIdGen::new();
        let alerts = detect(&rule, &events, &PolicyModifiers::default(), &mut ids);
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].event_count >= 5);
        assert_eq!(alerts[0].timestamp, events[0].timestamp);
    }

    #[test]
    fn no_alert_below_threshold() {
        let rule = make_rule(60, 50);
        let events: Vec<Event> = (0..10).map(auth_failure_event).collect();
        let mut ids = AlertIdGen::new();
        let alerts = detect(&rule, &events, &PolicyModifiers::default(), &mut ids);
        assert!(alerts.is_empty());
    }
}
