use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resilience metrics for one policy over one horizon. Produced once by
/// the metrics engine; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyMetrics {
    pub policy: String,
    pub availability_pct: f64,
    pub total_downtime_hr: f64,
    pub mean_mttd_min: f64,
    pub mean_mttr_min: f64,
    pub incidents_total: usize,
    pub incidents_by_severity: BTreeMap<String, usize>,
    pub incidents_by_threat: BTreeMap<String, usize>,
}

impl PolicyMetrics {
    /// The metrics of a policy with zero incidents over any horizon.
    pub fn empty(policy: impl Into<String>) -> Self {
        PolicyMetrics {
            policy: policy.into(),
            availability_pct: 100.0,
            total_downtime_hr: 0.0,
            mean_mttd_min: 0.0,
            mean_mttr_min: 0.0,
            incidents_total: 0,
            incidents_by_severity: BTreeMap::new(),
            incidents_by_threat: BTreeMap::new(),
        }
    }
}
