use crate::time::{parse_timestamp, Instant};
use crate::{Error, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event kinds the rule families know how to dispatch on. Anything else
/// is preserved verbatim as `Other` (the normalizer's "raw_log" bucket)
/// rather than rejected — unknown kinds are simply never matched by a
/// rule's `match.event` criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    TelemetryRead,
    AuthFailure,
    AuthSuccess,
    HttpRequest,
    RateExceeded,
    CmdExec,
    ServiceStatus,
    DbError,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::TelemetryRead => "telemetry_read",
            EventKind::AuthFailure => "auth_failure",
            EventKind::AuthSuccess => "auth_success",
            EventKind::HttpRequest => "http_request",
            EventKind::RateExceeded => "rate_exceeded",
            EventKind::CmdExec => "cmd_exec",
            EventKind::ServiceStatus => "service_status",
            EventKind::DbError => "db_error",
            EventKind::Other(s) => s,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(s: &str) -> Self {
        match s {
            "telemetry_read" => EventKind::TelemetryRead,
            "auth_failure" => EventKind::AuthFailure,
            "auth_success" => EventKind::AuthSuccess,
            "http_request" => EventKind::HttpRequest,
            "rate_exceeded" => EventKind::RateExceeded,
            "cmd_exec" => EventKind::CmdExec,
            "service_status" => EventKind::ServiceStatus,
            "db_error" => EventKind::DbError,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EventKind::from(s.as_str()))
    }
}

/// A single normalized telemetry/security record. Immutable once parsed;
/// the raw `timestamp` string is kept alongside the parsed `ts` instant
/// so emission never needs to reformat through a lossy round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: String,
    #[serde(skip)]
    pub ts: Instant,
    pub source: String,
    pub component: String,
    pub event: EventKind,
    pub actor: String,
    pub ip: String,
    pub key: String,
    pub value: String,
    pub unit: String,
    pub severity: Severity,
    pub tags: String,
    pub correlation_id: String,
}

/// Column order for CSV interchange. Part of the external interface.
pub const EVENT_CSV_COLUMNS: [&str; 12] = [
    "timestamp",
    "source",
    "component",
    "event",
    "actor",
    "ip",
    "key",
    "value",
    "unit",
    "severity",
    "tags",
    "correlation_id",
];

impl Event {
    /// Build an `Event` from the fixed CSV/JSONL column order, parsing the
    /// timestamp and severity. Missing optional fields default to empty
    /// string; severity defaults to `low` when blank.
    pub fn from_fields(
        timestamp: impl Into<String>,
        source: impl Into<String>,
        component: impl Into<String>,
        event: impl Into<String>,
        actor: impl Into<String>,
        ip: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
        unit: impl Into<String>,
        severity: impl AsRef<str>,
        tags: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Result<Self, Error> {
        let timestamp = timestamp.into();
        let ts = parse_timestamp(&timestamp)?;
        let severity_raw = severity.as_ref().trim();
        let severity = if severity_raw.is_empty() {
            Severity::Low
        } else {
            severity_raw.parse()?
        };
        Ok(Event {
            timestamp,
            ts,
            source: source.into(),
            component: component.into(),
            event: EventKind::from(event.into().as_str()),
            actor: actor.into(),
            ip: ip.into(),
            key: key.into(),
            value: value.into(),
            unit: unit.into(),
            severity,
            tags: tags.into(),
            correlation_id: correlation_id.into(),
        })
    }

    /// Tags are stored semicolon-joined; this splits them back out,
    /// dropping empty segments.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags.split(';').map(str::trim).filter(|s| !s.is_empty()).collect()
    }

    /// `value` parsed as a number, for telemetry-spoof anomaly checks.
    /// Non-numeric values are not an error; callers skip them.
    pub fn value_as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_event_kind_is_preserved_as_other() {
        let e = Event::from_fields(
            "2026-02-26T10:00:00Z", "dev-1", "edge", "firmware_flash", "", "", "", "", "", "low", "", "",
        )
        .unwrap();
        assert_eq!(e.event.as_str(), "firmware_flash");
    }

    #[test]
    fn blank_severity_defaults_to_low() {
        let e = Event::from_fields(
            "2026-02-26T10:00:00Z", "dev-1", "edge", "telemetry_read", "", "", "", "", "", "", "", "",
        )
        .unwrap();
        assert_eq!(e.severity, Severity::Low);
    }

    #[test]
    fn empty_timestamp_is_rejected() {
        let r = Event::from_fields("", "s", "c", "e", "", "", "", "", "", "low", "", "");
        assert!(r.is_err());
    }

    #[test]
    fn tag_list_splits_and_trims() {
        let e = Event::from_fields(
            "2026-02-26T10:00:00Z", "s", "c", "e", "", "", "", "", "", "low", " a ; b;;c ", "",
        )
        .unwrap();
        assert_eq!(e.tag_list(), vec!["a", "b", "c"]);
    }
}
