use crate::common::{event_ids_for, AlertIdGen};
use crate::rule::Rule;
use crate::window::first_window_trigger;
use sentinel_core::{Alert, Event, PolicyModifiers, Severity};
use std::collections::BTreeMap;

/// RULE-SPOOF-*: telemetry integrity attacks. Groups `telemetry_read`
/// events by (source, key); a reading is anomalous if it falls outside
/// the rule's declared bounds for that key, or jumps by more than
/// `delta[key]` from the previous reading in the group. The sliding
/// window then runs over the anomaly list itself, not the raw readings.
pub fn detect(rule: &Rule, events: &[Event], modifiers: &PolicyModifiers, ids: &mut AlertIdGen) -> Vec<Alert> {
    let m = modifiers.get(rule.threat_type);
    let (window, threshold) = rule.effective_window_and_threshold(m.window_multiplier, m.threshold_multiplier);

    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (idx, e) in events.iter().enumerate() {
        if e.event.as_str() != "telemetry_read" || e.value_as_f64().is_none() {
            continue;
        }
        groups.entry((e.source.clone(), e.key.clone())).or_default().push(idx);
    }

    let mut alerts = Vec::new();
    for ((source, key), idxs) in groups {
        let bounds = rule.bounds.get(&key).copied();
        let delta = rule.delta.get(&key).copied();

        let mut anomalies: Vec<usize> = Vec::new();
        let mut previous: Option<f64> = None;
        for &gi in &idxs {
            let value = events[gi].value_as_f64().expect("filtered to numeric above");
            let out_of_bounds = bounds.map(|(lo, hi)| value < lo || value > hi).unwrap_or(false);
            let jumped = match (previous, delta) {
                (Some(prev), Some(d)) => (value - prev).abs() > d,
                _ => false,
            };
            if out_of_bounds || jumped {
                anomalies.push(gi);
            }
            previous = Some(value);
        }

        let local: Vec<(usize, i64)> = anomalies.iter().enumerate().map(|(pos, &gi)| (pos, events[gi].ts)).collect();
        let Some(fired) = first_window_trigger(&local, window, threshold) else { continue };
        let member_idxs: Vec<usize> = fired.iter().map(|&pos| anomalies[pos]).collect();
        let members: Vec<&Event> = member_idxs.iter().map(|&i| &events[i]).collect();
        let first = members[0];

        let (severity, confidence) = if members.len() >= 5 {
            (Severity::High, 0.90)
        } else {
            (rule.severity, rule.confidence)
        };

        alerts.push(Alert {
            alert_id: ids.next_id(),
            rule_id: rule.id.clone(),
            threat_type: rule.threat_type.to_string(),
            severity,
            confidence,
            timestamp: first.timestamp.clone(),
            ts: first.ts,
            component: first.component.clone(),
            source: source.clone(),
            description: format!("telemetry spoofing on {source}/{key}: {} anomalous readings", members.len()),
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

    fn make_rule() -> Rule {
        let cfg: RuleConfig = serde_yaml::from_str(
            "id: RULE-SPOOF-001\nthreat_type: integrity_attack\nwindow_sec: 60\nthreshold: 3\nseverity: medium\nconfidence: 0.6\nbounds:\n  voltage:\n    min: 200.0\n    max: 250.0\ndelta:\n  voltage: 10.0\n",
        )
        .unwrap();
        Rule::from_config(cfg).unwrap()
    }

    fn reading(i: i64, value: &str) -> Event {
        Event::from_fields(
            sentinel_core::format_instant(1_700_000_000 + i * 5),
            "inv-01",
            "inverter",
            "telemetry_read",
            "",
            "",
            "voltage",
            value,
            "V",
            "low",
            "",
            "",
        )
        .unwrap()
    }

    #[test]
    fn flags_out_of_bounds_readings() {
        let rule = make_rule();
        let events: Vec<Event> = vec![
            reading(0, "220"),
            reading(1, "225"),
            reading(2, "400"),
            reading(3, "410"),
            reading(4, "420"),
        ];
        let mut ids = AlertIdGen::new();
        let alerts = detect(&rule, &events, &PolicyModifiers::default(), &mut ids);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].event_count, 3);
    }

    #[test]
    fn non_numeric_values_are_skipped_not_errored() {
        let rule = make_rule();
        let mut events: Vec<Event> = vec![reading(0, "220")];
        events.push(
            Event::from_fields(
                sentinel_core::format_instant(1_700_000_005),
                "inv-01",
                "inverter",
                "telemetry_read",
                "",
                "",
                "voltage",
                "not-a-number",
                "V",
                "low",
                "",
                "",
            )
            .unwrap(),
        );
        let mut ids = AlertIdGen::new();
        let alerts = detect(&rule, &events, &PolicyModifiers::default(), &mut ids);
        assert!(alerts.is_empty());
    }
}
