use crate::common::AlertIdGen;
use crate::families::{brute_force, ddos, outage, spoof, ucmd};
use crate::rule::{Rule, RuleFamily};
use sentinel_core::{Alert, Event, PolicyModifiers};
use tracing::{debug, warn};

/// Evaluate every enabled rule against `events`, subject to `modifiers`,
/// and return all resulting Alerts sorted by timestamp (stable, so ties
/// fall back to firing order — which is also `alert_id` order).
///
/// Deterministic for a fixed input. Disabled rules and rules whose id
/// prefix doesn't map to a known family are skipped and logged, never
/// treated as a hard failure.
pub fn detect(events: &[Event], rules: &[Rule], modifiers: &PolicyModifiers) -> Vec<Alert> {
    let mut ids = AlertIdGen::new();
    let mut alerts = Vec::new();

    for rule in rules {
        if !rule.enabled {
            debug!(rule_id = %rule.id, "rule disabled, skipping");
            continue;
        }
        let mut fired = match rule.family {
            RuleFamily::BruteForce => brute_force::detect(rule, events, modifiers, &mut ids),
            RuleFamily::Ddos => ddos::detect(rule, events, modifiers, &mut ids),
            RuleFamily::Spoof => spoof::detect(rule, events, modifiers, &mut ids),
            RuleFamily::UnauthorizedCmd => ucmd::detect(rule, events, modifiers, &mut ids),
            RuleFamily::Outage => outage::detect(rule, events, modifiers, &mut ids),
        };
        alerts.append(&mut fired);
    }

    alerts.sort_by_key(|a| a.ts);
    alerts
}

/// Parse and validate rule configs, logging and dropping any that don't
/// map to a known rule family instead of aborting the run.
pub fn load_rules(configs: Vec<crate::rule::RuleConfig>) -> Vec<Rule> {
    configs
        .into_iter()
        .filter_map(|cfg| match Rule::from_config(cfg) {
            Ok(rule) => Some(rule),
            Err(e) => {
                warn!(error = %e, "skipping unparseable rule");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_alerts() {
        assert!(detect(&[], &[], &PolicyModifiers::default()).is_empty());
    }

    #[test]
    fn alerts_are_sorted_by_timestamp() {
        let bf: Rule = Rule::from_config(
            serde_yaml::from_str(
                "id: RULE-BF-001\nthreat_type: credential_attack\nwindow_sec: 60\nthreshold: 2\nseverity: high\nconfidence: 0.8\n",
            )
            .unwrap(),
        )
        .unwrap();
        let events = vec![
            Event::from_fields(
                "2026-02-26T10:00:00Z", "a", "api", "auth_failure", "", "1.1.1.1", "", "", "", "low", "", "",
            )
            .unwrap(),
            Event::from_fields(
                "2026-02-26T10:00:01Z", "a", "api", "auth_failure", "", "1.1.1.1", "", "", "", "low", "", "",
            )
            .unwrap(),
            Event::from_fields(
                "2026-02-26T10:00:00Z", "b", "api", "auth_failure", "", "2.2.2.2", "", "", "", "low", "", "",
            )
            .unwrap(),
            Event::from_fields(
                "2026-02-26T10:00:01Z", "b", "api", "auth_failure", "", "2.2.2.2", "", "", "", "low", "", "",
            )
            .unwrap(),
        ];
        let alerts = detect(&events, &[bf], &PolicyModifiers::default());
        let ts: Vec<i64> = alerts.iter().map(|a| a.ts).collect();
        let mut sorted = ts.clone();
        sorted.sort();
        assert_eq!(ts, sorted);
    }
}
