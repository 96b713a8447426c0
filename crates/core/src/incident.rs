use crate::time::Instant;
use crate::Severity;
use serde::{Deserialize, Serialize};

/// A cluster of ≥1 Alerts, tagged with the policy it was evaluated under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    pub policy: String,
    pub threat_type: String,
    pub severity: Severity,
    pub component: String,
    pub event_count: usize,
    pub start_ts: String,
    pub detect_ts: String,
    pub recover_ts: String,
    #[serde(skip)]
    pub start_instant: Instant,
    #[serde(skip)]
    pub detect_instant: Instant,
    #[serde(skip)]
    pub recover_instant: Instant,
    pub mttd_sec: f64,
    pub mttr_sec: f64,
    pub impact_score: f64,
    pub description: String,
    pub response_action: String,
}

pub const INCIDENT_CSV_COLUMNS: [&str; 14] = [
    "incident_id",
    "policy",
    "threat_type",
    "severity",
    "component",
    "event_count",
    "start_ts",
    "detect_ts",
    "recover_ts",
    "mttd_sec",
    "mttr_sec",
    "impact_score",
    "description",
    "response_action",
];

impl Incident {
    /// Whether this incident counts toward downtime: only high/critical
    /// severity incidents with a well-formed detect→recover interval.
    pub fn counts_toward_downtime(&self) -> bool {
        matches!(self.severity, Severity::High | Severity::Critical)
            && self.recover_instant > self.detect_instant
    }
}
