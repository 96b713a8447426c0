use crate::timings::base_timings;
use sentinel_core::{format_instant, Alert, Incident, PolicyModifiers, Severity, ThreatType};
use std::collections::BTreeSet;

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Build one Incident from a cluster of Alerts, already known to share
/// an incident grouping. Alerts need not be pre-sorted; this sorts a
/// local copy by timestamp before computing `start_ts`.
pub fn build_incident(mut alerts: Vec<Alert>, policy: &str, modifiers: &PolicyModifiers, incident_id: String) -> Incident {
    alerts.sort_by_key(|a| a.ts);

    // A correlation-id-tagged cluster may in principle mix threat types;
    // the earliest alert's threat type is treated as representative for
    // timing-table lookup and the modifier set applied.
    let representative: ThreatType = alerts[0].threat_type.parse().unwrap_or(ThreatType::Outage);
    let m = modifiers.get(representative);

    let start_ts = alerts[0].ts;
    let (base_mttd, base_mttr) = base_timings(representative);
    let mttd_sec = (base_mttd * m.mttd_multiplier).round();
    let mttr_sec = (base_mttr * m.mttr_multiplier).round();
    let detect_ts = start_ts + mttd_sec as i64;
    let recover_ts = detect_ts + mttr_sec as i64;

    let severity = alerts.iter().map(|a| a.severity).max().unwrap_or(Severity::Low);

    let avg_confidence = alerts.iter().map(|a| a.confidence).sum::<f64>() / alerts.len() as f64;
    let impact_score = (severity.weight() * avg_confidence * m.impact_multiplier).clamp(0.0, 1.0);

    let event_count = alerts.iter().map(|a| a.event_count).sum();

    let components: BTreeSet<&str> = alerts.iter().map(|a| a.component.as_str()).collect();
    let component = components.into_iter().collect::<Vec<_>>().join(";");

    let descriptions: BTreeSet<&str> = alerts.iter().map(|a| a.description.as_str()).collect();
    let description = descriptions.into_iter().collect::<Vec<_>>().join(" | ");

    let mut hints: BTreeSet<&str> = alerts
        .iter()
        .map(|a| a.response_hint.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let response_action = if hints.is_empty() {
        "notify".to_string()
    } else {
        hints.drain(..).collect::<Vec<_>>().join("; ")
    };

    Incident {
        incident_id,
        policy: policy.to_string(),
        threat_type: representative.to_string(),
        severity,
        component,
        event_count,
        start_ts: alerts[0].timestamp.clone(),
        detect_ts: format_instant(detect_ts),
        recover_ts: format_instant(recover_ts),
        start_instant: start_ts,
        detect_instant: detect_ts,
        recover_instant: recover_ts,
        mttd_sec,
        mttr_sec,
        impact_score: round4(impact_score),
        description,
        response_action,
    }
}
