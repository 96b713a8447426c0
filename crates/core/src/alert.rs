use crate::time::Instant;
use crate::Severity;
use serde::{Deserialize, Serialize};

/// One detector finding: ≥1 correlated Events that satisfied a rule.
/// One-way derived from Events; never mutated after emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub alert_id: String,
    pub rule_id: String,
    pub threat_type: String,
    pub severity: Severity,
    pub confidence: f64,
    pub timestamp: String,
    #[serde(skip)]
    pub ts: Instant,
    pub component: String,
    pub source: String,
    pub description: String,
    pub event_count: usize,
    /// Semicolon-joined; may contain `COR-*` correlation tokens or raw
    /// timestamps of the member events, per the detector family that
    /// produced this alert.
    pub event_ids: String,
    pub response_hint: String,
}

pub const ALERT_CSV_COLUMNS: [&str; 11] = [
    "alert_id",
    "rule_id",
    "threat_type",
    "severity",
    "confidence",
    "timestamp",
    "component",
    "source",
    "description",
    "event_count",
    "response_hint",
];

impl Alert {
    pub fn event_id_tokens(&self) -> Vec<&str> {
        self.event_ids.split(';').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// The lexicographically smallest `COR-*` token carried by this alert,
    /// if any. Used by the correlator's explicit-correlation-id grouping.
    pub fn smallest_correlation_tag(&self) -> Option<&str> {
        self.event_id_tokens()
            .into_iter()
            .filter(|t| t.starts_with("COR-"))
            .min()
    }
}
