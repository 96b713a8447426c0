use sentinel_core::Alert;
use std::collections::HashMap;

/// Result of the two-phase grouping pass: an ordered list of alert
/// clusters, in the traversal order incident ids are assigned from
/// (all correlation-id groups first, in order of first appearance,
/// then locality groups in creation order).
pub fn group_alerts(alerts: &[Alert], merge_window_sec: i64) -> Vec<Vec<Alert>> {
    let mut cor_order: Vec<String> = Vec::new();
    let mut cor_groups: HashMap<String, Vec<Alert>> = HashMap::new();
    let mut remaining: Vec<&Alert> = Vec::new();

    for alert in alerts {
        if let Some(tag) = alert.smallest_correlation_tag() {
            if !cor_groups.contains_key(tag) {
                cor_order.push(tag.to_string());
            }
            cor_groups.entry(tag.to_string()).or_default().push(alert.clone());
        } else {
            remaining.push(alert);
        }
    }

    let mut groups: Vec<Vec<Alert>> = cor_order.into_iter().map(|tag| cor_groups.remove(&tag).unwrap()).collect();

    // Locality phase: (component, threat_type) keyed, time-windowed.
    // `remaining` is a subsequence of the globally timestamp-sorted
    // input, so tracking a single "current" open group per key and
    // comparing against its running max timestamp is sufficient.
    let mut open: HashMap<(String, String), usize> = HashMap::new();
    for alert in remaining {
        let key = (alert.component.clone(), alert.threat_type.clone());
        let reopen = open
            .get(&key)
            .map(|&idx| (alert.ts - groups[idx].last().map(|a| a.ts).unwrap_or(alert.ts)).abs() <= merge_window_sec)
            .unwrap_or(false);
        if reopen {
            let idx = open[&key];
            groups[idx].push(alert.clone());
        } else {
            groups.push(vec![alert.clone()]);
            open.insert(key, groups.len() - 1);
        }
    }

    groups
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
    fn cor_tagged_alerts_merge_regardless_of_gap() {
        let a = alert(0, "api", "credential_attack", "COR-001");
        let b = alert(30, "api", "credential_attack", "COR-001");
        let groups = group_alerts(&[a, b], 120);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
    }

    #[test]
    fn locality_merges_within_window_splits_beyond() {
        let a = alert(0, "api", "credential_attack", "");
        let b = alert(60, "api", "credential_attack", "");
        let merged = group_alerts(&[a.clone(), b.clone()], 120);
        assert_eq!(merged.len(), 1);

        let c = alert(0, "api", "credential_attack", "");
        let d = alert(300, "api", "credential_attack", "");
        let split = group_alerts(&[c, d], 120);
        assert_eq!(split.len(), 2);
    }
}
