use crate::common::{event_ids_for, AlertIdGen};
use crate::rule::Rule;
use crate::window::first_window_trigger;
use sentinel_core::{Alert, Event, PolicyModifiers};
use std::collections::BTreeMap;

/// RULE-OUT-*: service outages. Filters by the rule's match event (or
/// `service_status` by default) and, if declared, an allowed-value set;
/// partitions by source. On firing, the first `severity_override` entry
/// matched by any buffered event's value escalates the alert severity.
pub fn detect(rule: &Rule, events: &[Event], modifiers: &PolicyModifiers, ids: &mut AlertIdGen) -> Vec<Alert> {
    let m = modifiers.get(rule.threat_type);
    let (window, threshold) = rule.effective_window_and_threshold(m.window_multiplier, m.threshold_multiplier);

    let match_kind = rule.match_event.as_ref().map(|k| k.as_str()).unwrap_or("service_status");

    let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, e) in events.iter().enumerate() {
        if e.event.as_str() != match_kind {
            continue;
        }
        if !rule.allowed_values.is_empty() && !rule.allowed_values.iter().any(|v| v == &e.value) {
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

        let severity = rule
            .severity_override
            .iter()
            .find_map(|(value, sev)| members.iter().any(|e| &e.value == value).then_some(*sev))
            .unwrap_or(rule.severity);

        alerts.push(Alert {
            alert_id: ids.next_id(),
            rule_id: rule.id.clone(),
            threat_type: rule.threat_type.to_string(),
            severity,
            confidence: rule.confidence,
            timestamp: first.timestamp.clone(),
            ts: first.ts,
            component: first.component.clone(),
            source: source.clone(),
            description: format!("service outage on {source}: {} matching events within {window}s", members.len()),
            event_count: members.len(),
            event_ids: event_ids_for(&members),
            response_hint: rule.response_hint.clone(),
        });
    }
    alerts
}
