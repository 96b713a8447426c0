use crate::common::{event_ids_for, AlertIdGen};
use crate::rule::Rule;
use sentinel_core::{Alert, Event, PolicyModifiers, Severity};

/// RULE-UCMD-*: unauthorized command execution. A `cmd_exec` event is
/// unauthorized when its actor (case-insensitive, trimmed) is empty or
/// absent from the rule's allowed-actor set. Unlike the sliding-window
/// families this emits at most one alert across the whole run, not per
/// partition.
pub fn detect(rule: &Rule, events: &[Event], modifiers: &PolicyModifiers, ids: &mut AlertIdGen) -> Vec<Alert> {
    let _ = modifiers; // UCMD has no window/threshold to scale; kept for a uniform family signature.

    let unauthorized: Vec<&Event> = events
        .iter()
        .filter(|e| e.event.as_str() == "cmd_exec")
        .filter(|e| {
            let actor = e.actor.trim().to_ascii_lowercase();
            actor.is_empty() || !rule.allowed_actors.contains(&actor)
        })
        .collect();

    if unauthorized.is_empty() {
        return Vec::new();
    }

    let first = unauthorized[0];
    let confidence = if unauthorized.len() >= 3 { 0.99 } else { rule.confidence };

    vec![Alert {
        alert_id: ids.next_id(),
        rule_id: rule.id.clone(),
        threat_type: rule.threat_type.to_string(),
        severity: Severity::Critical,
        confidence,
        timestamp: first.timestamp.clone(),
        ts: first.ts,
        component: first.component.clone(),
        source: first.source.clone(),
        description: format!("unauthorized command execution: {} event(s)", unauthorized.len()),
        event_count: unauthorized.len(),
        event_ids: event_ids_for(&unauthorized),
        response_hint: rule.response_hint.clone(),
    }]
}
