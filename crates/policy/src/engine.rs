use crate::config::PoliciesConfig;
use sentinel_core::PolicyModifiers;
use serde::Serialize;
use tracing::warn;

/// Per-threat_type modifier map for `policy_name`. Unknown policy names
/// are not an error (open question in the source spec, resolved as
/// silent baseline fallback): they warn and return the all-1.0 neutral
/// element, same as a policy declared with no `modifiers` section at all.
pub fn get_modifiers(policies: &PoliciesConfig, policy_name: &str) -> PolicyModifiers {
    match policies.get(policy_name) {
        Some(cfg) => cfg.modifiers.clone(),
        None => {
            warn!(policy = policy_name, "policy not found — using default multipliers (1.0)");
            PolicyModifiers::default()
        }
    }
}

/// Declared policy names, in `policies.yaml`'s declaration order.
pub fn list_policy_names(policies: &PoliciesConfig) -> Vec<String> {
    policies.order.clone()
}

/// One ranked policy entry, per `spec.md` §4.4.
#[derive(Debug, Clone, Serialize)]
pub struct ControlRanking {
    pub policy: String,
    pub enabled_controls: Vec<String>,
    pub avg_mttd_mult: f64,
    pub avg_mttr_mult: f64,
    pub effectiveness: f64,
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Rank `selected` policies by control-set effectiveness, descending.
/// `avg_*_mult` are arithmetic means of the per-threat-type multipliers
/// actually present in that policy's `modifiers` map (threat types absent
/// from the map do not contribute a neutral 1.0 to the average — only
/// present entries are averaged, matching the declarative source).
pub fn rank_controls(policies: &PoliciesConfig, selected: &[String]) -> Vec<ControlRanking> {
    let mut ranked: Vec<ControlRanking> = selected
        .iter()
        .map(|name| {
            let Some(cfg) = policies.get(name) else {
                return ControlRanking {
                    policy: name.clone(),
                    enabled_controls: Vec::new(),
                    avg_mttd_mult: 1.0,
                    avg_mttr_mult: 1.0,
                    effectiveness: round3(1.0 - (1.0 + 1.0) / 2.0),
                };
            };

            let mttd_vals: Vec<f64> = cfg.modifiers.0.values().map(|m| m.mttd_multiplier).collect();
            let mttr_vals: Vec<f64> = cfg.modifiers.0.values().map(|m| m.mttr_multiplier).collect();
            let avg_mttd = if mttd_vals.is_empty() { 1.0 } else { mttd_vals.iter().sum::<f64>() / mttd_vals.len() as f64 };
            let avg_mttr = if mttr_vals.is_empty() { 1.0 } else { mttr_vals.iter().sum::<f64>() / mttr_vals.len() as f64 };

            let mut enabled_controls: Vec<String> =
                cfg.controls.iter().filter(|(_, c)| c.enabled).map(|(name, _)| name.clone()).collect();
            enabled_controls.sort();

            ControlRanking {
                policy: name.clone(),
                enabled_controls,
                avg_mttd_mult: round3(avg_mttd),
                avg_mttr_mult: round3(avg_mttr),
                effectiveness: round3(1.0 - (avg_mttd + avg_mttr) / 2.0),
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.effectiveness.partial_cmp(&a.effectiveness).unwrap());
    ranked
}
