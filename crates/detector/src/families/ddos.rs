use crate::common::{event_ids_for, AlertIdGen};
use crate::rule::Rule;
use crate::window::first_window_trigger;
use sentinel_core::{Alert, Event, PolicyModifiers, Severity};
use std::collections::BTreeMap;

const SERVICE_IMPACT_WINDOW_SEC: i64 = 120;

/// RULE-DDOS-*: volumetric availability attacks. Partitions
/// `rate_exceeded` events by source; escalates to critical when a
/// correlated `service_status` degradation follows within 120s.
pub fn detect(rule: &Rule, events: &[Event], modifiers: &PolicyModifiers, ids: &mut AlertIdGen) -> Vec<Alert> {
    let m = modifiers.get(rule.threat_type);
    let (window, threshold) = rule.effective_window_and_threshold(m.window_multiplier, m.threshold_multiplier);

    let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, e) in events.iter().enumerate() {
        if e.event.as_str() != "rate_exceeded" {
            continue;
        }
        partitions.entry(e.source.clone()).or_default().push(idx);
    }

    let mut alerts = Vec::new();
    for (source, idxs) in partitions {
        let local: Vec<(usize, i64)> = idxs.iter().enumerate().map(|(pos, &gi)| (pos, events[gi].ts)).collect();
        let Some(fired) = first_window_trigger(&local, window, threshold) else { continue };
        let member_idxs: Vec<usize> = fired.iter().map(|&pos| idxs[pos]).collect();
        let members: Vec<&Event> = member_idxs.iter().map(|&i| &events[i]).collect();
        let first = members[0];

        let service_impact = events.iter().any(|e| {
            e.source == source
                && e.event.as_str() == "service_status"
                && matches!(e.value.as_str(), "degraded" | "down")
                && e.ts >= first.ts
                && e.ts - first.ts <= SERVICE_IMPACT_WINDOW_SEC
        });

        let (severity, confidence) = if service_impact {
            (Severity::Critical, 0.98)
        } else {
            (rule.severity, rule.confidence)
        };
        let description = if service_impact {
            format!(
                "DDoS on {source}: {} rate-limit events within {window}s, confirmed service impact",
                members.len()
            )
        } else {
            format!("DDoS on {source}: {} rate-limit events within {window}s", members.len())
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
            description,
            event_count: members.len(),
            event_ids: event_ids_for(&members),
            response_hint: rule.response_hint.clone(),
        });
    }
    alerts
}
