//! Data contracts and error framework shared by every stage of the
//! resilience analyzer: the `Event`/`Alert`/`Incident`/`PolicyMetrics`
//! records, the `Severity` and `ThreatType` total orders, timestamp
//! parsing, and the error taxonomy. Nothing in this crate runs I/O.

pub mod alert;
pub mod error;
pub mod event;
pub mod incident;
pub mod metrics;
pub mod modifiers;
pub mod severity;
pub mod time;

pub use alert::{Alert, ALERT_CSV_COLUMNS};
pub use error::{Error, Result};
pub use event::{Event, EventKind, EVENT_CSV_COLUMNS};
pub use incident::{Incident, INCIDENT_CSV_COLUMNS};
pub use metrics::PolicyMetrics;
pub use modifiers::{PolicyModifiers, ThreatModifiers};
pub use severity::{Severity, ThreatType};
pub use time::{format_instant, parse_timestamp, Instant};
