//! Clusters `Alert`s into `Incident`s by explicit correlation tag and by
//! spatio-temporal locality, applying per-policy time-parameter modifiers.

mod build;
mod group;
mod timings;

use sentinel_core::{Alert, Incident, PolicyModifiers};

pub use timings::base_timings;

const DEFAULT_MERGE_WINDOW_SEC: i64 = 120;

/// `correlate(alerts, policy_name, modifiers) -> incidents sorted by start_ts`.
///
/// Two-phase grouping: alerts carrying a `COR-*` correlation tag join the
/// group keyed by their lexicographically smallest tag; everything else is
/// grouped by (component, threat_type) with a 120s merge window. See
/// `group::group_alerts` and `build::build_incident`.
pub fn correlate(alerts: &[Alert], policy_name: &str, modifiers: &PolicyModifiers) -> Vec<Incident> {
    correlate_with_window(alerts, policy_name, modifiers, DEFAULT_MERGE_WINDOW_SEC)
}

/// Same as [`correlate`] with an explicit merge window, for tests and for
/// callers that want to tune locality grouping.
pub fn correlate_with_window(
    alerts: &[Alert],
    policy_name: &str,
    modifiers: &PolicyModifiers,
    merge_window_sec: i64,
) -> Vec<Incident> {
    let mut sorted: Vec<Alert> = alerts.to_vec();
    sorted.sort_by_key(|a| a.ts);

    let groups = group::group_alerts(&sorted, merge_window_sec);

    let mut incidents: Vec<Incident> = groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| build::build_incident(group, policy_name, modifiers, format!("INC-{:03}", i + 1)))
        .collect();

    incidents.sort_by_key(|inc| inc.start_instant);
    incidents
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Severity;

    fn alert(ts: i64, component: &str, threat_type: &str, event_ids: &str) -> Alert {
        Alert {
            alert_id: format!("ALR-{ts:04}"),
            rule_id: "RULE-BF-001".into(),
            threat_type: threat_type.into(),
            severity: Severity::High,
            confidence: 0.8,
            timestamp: sentinel_core::format_instant(ts),
            ts,
            component: component.into(),
            source: "src".into(),
            description: "d".into(),
            event_count: 1,
            event_ids: event_ids.into(),
            response_hint: String::new(),
        }
    }

    #[test]
    fn empty_input_yields_no_incidents() {
        assert!(correlate(&[], "baseline", &PolicyModifiers::default()).is_empty());
    }

    #[test]
    fn cor_tag_merges_into_one_incident() {
        let alerts = vec![
            alert(0, "api", "credential_attack", "COR-001"),
            alert(30, "api", "credential_attack", "COR-001"),
        ];
        let incidents = correlate(&alerts, "baseline", &PolicyModifiers::default());
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].event_count, 2);
    }

    #[test]
    fn locality_split_beyond_merge_window() {
        let alerts = vec![
            alert(0, "api", "credential_attack", ""),
            alert(300, "api", "credential_attack", ""),
        ];
        let incidents = correlate(&alerts, "baseline", &PolicyModifiers::default());
        assert_eq!(incidents.len(), 2);
    }

    #[test]
    fn incidents_are_sorted_by_start_ts() {
        let alerts = vec![
            alert(500, "db", "outage", ""),
            alert(0, "api", "credential_attack", ""),
        ];
        let incidents = correlate(&alerts, "baseline", &PolicyModifiers::default());
        let starts: Vec<i64> = incidents.iter().map(|i| i.start_instant).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn incident_ids_are_monotonic() {
        let alerts = vec![
            alert(0, "api", "credential_attack", ""),
            alert(500, "db", "outage", ""),
        ];
        let incidents = correlate(&alerts, "baseline", &PolicyModifiers::default());
        assert_eq!(incidents[0].incident_id, "INC-001");
        assert_eq!(incidents[1].incident_id, "INC-002");
    }
}
