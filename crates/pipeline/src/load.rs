use sentinel_core::{Event, EVENT_CSV_COLUMNS};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// A raw record in the fixed Event column order, with every optional
/// field defaulted to empty string when absent.
#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    component: String,
    #[serde(default)]
    event: String,
    #[serde(default)]
    actor: String,
    #[serde(default)]
    ip: String,
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    tags: String,
    #[serde(default)]
    correlation_id: String,
}

impl RawEvent {
    fn into_event(self) -> Result<Event, sentinel_core::Error> {
        Event::from_fields(
            self.timestamp,
            self.source,
            self.component,
            self.event,
            self.actor,
            self.ip,
            self.key,
            self.value,
            self.unit,
            self.severity,
            self.tags,
            self.correlation_id,
        )
    }
}

/// Whether `path`'s extension selects the JSONL/NDJSON line-delimited
/// reader over the CSV reader. Anything else (including no extension)
/// falls back to CSV, per the Event stream input dispatch rule.
pub fn is_jsonl_path(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("jsonl") | Some("ndjson"))
}

/// Load events from a CSV file with the fixed header column order
/// (`EVENT_CSV_COLUMNS`). A malformed row is logged as a warning and
/// skipped — the load never aborts on a single bad row.
pub fn load_events_csv(raw: &str) -> Vec<Event> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(raw.as_bytes());
    let mut events = Vec::new();
    for (row_no, result) in reader.deserialize::<RawEvent>().enumerate() {
        match result.map_err(|e| e.to_string()).and_then(|r: RawEvent| r.into_event().map_err(|e| e.to_string())) {
            Ok(event) => events.push(event),
            Err(e) => warn!(row = row_no + 2, error = %e, "skipping malformed CSV event row"),
        }
    }
    info!(count = events.len(), "loaded events from CSV");
    events
}

/// Load events from a JSONL/NDJSON file (one JSON object per line). Blank
/// lines are ignored; a malformed line is logged as a warning and
/// skipped.
pub fn load_events_jsonl(raw: &str) -> Vec<Event> {
    let mut events = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawEvent>(line).map_err(|e| e.to_string()).and_then(|r| r.into_event().map_err(|e| e.to_string())) {
            Ok(event) => events.push(event),
            Err(e) => warn!(line = line_no + 1, error = %e, "skipping malformed JSONL event line"),
        }
    }
    info!(count = events.len(), "loaded events from JSONL");
    events
}

/// Parse complete JSONL lines out of `raw` (bytes newly appended to a
/// watched file), returning the parsed events and the number of bytes
/// consumed. A trailing line with no terminating `\n` yet is not a
/// complete record — it is left unconsumed (the returned byte count
/// stops at the last `\n`) so the watch loop re-reads it, completed,
/// on the next poll instead of parsing a truncated JSON object.
pub fn parse_appended_jsonl(raw: &str) -> (Vec<Event>, usize) {
    let consumed = match raw.rfind('\n') {
        Some(idx) => idx + 1,
        None => return (Vec::new(), 0),
    };
    let mut events = Vec::new();
    for (line_no, line) in raw[..consumed].lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawEvent>(line).map_err(|e| e.to_string()).and_then(|r| r.into_event().map_err(|e| e.to_string())) {
            Ok(event) => events.push(event),
            Err(e) => warn!(line = line_no + 1, error = %e, "skipping malformed JSONL event line"),
        }
    }
    (events, consumed)
}

/// Auto-detect format by file extension (`.jsonl`/`.ndjson` → JSONL, else
/// CSV) and load events from `path`.
pub fn load_events(path: &Path) -> std::io::Result<Vec<Event>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(if is_jsonl_path(path) { load_events_jsonl(&raw) } else { load_events_csv(&raw) })
}

/// Column order documented for the Event CSV contract, re-exported so
/// writers stay in lockstep with the reader's expectations.
pub const EVENT_COLUMNS: [&str; 12] = EVENT_CSV_COLUMNS;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_well_formed_csv() {
        let raw = "timestamp,source,component,event,actor,ip,key,value,unit,severity,tags,correlation_id\n2026-02-26T10:00:00Z,dev-1,edge,telemetry_read,,,,,,low,,\n";
        let events = load_events_csv(raw);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn skips_malformed_csv_row_without_aborting() {
        let raw = "timestamp,source,component,event,actor,ip,key,value,unit,severity,tags,correlation_id\n,dev-1,edge,telemetry_read,,,,,,low,,\n2026-02-26T10:00:01Z,dev-1,edge,telemetry_read,,,,,,low,,\n";
        let events = load_events_csv(raw);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn loads_jsonl_and_skips_bad_lines() {
        let raw = "{\"timestamp\":\"2026-02-26T10:00:00Z\",\"source\":\"a\",\"component\":\"edge\",\"event\":\"telemetry_read\"}\nnot json\n";
        let events = load_events_jsonl(raw);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn parse_appended_jsonl_consumes_only_complete_lines() {
        let raw = "{\"timestamp\":\"2026-02-26T10:00:00Z\",\"source\":\"a\",\"component\":\"edge\",\"event\":\"telemetry_read\"}\n{\"timestamp\":\"2026-02-26T10:00:01Z\"";
        let (events, consumed) = parse_appended_jsonl(raw);
        assert_eq!(events.len(), 1);
        assert_eq!(consumed, raw.find('\n').unwrap() + 1);
    }

    #[test]
    fn parse_appended_jsonl_with_no_newline_consumes_nothing() {
        let (events, consumed) = parse_appended_jsonl("{\"timestamp\":\"2026-02-26T10:00:00Z\"");
        assert!(events.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn dispatches_by_extension() {
        assert!(is_jsonl_path(Path::new("events.jsonl")));
        assert!(is_jsonl_path(Path::new("events.ndjson")));
        assert!(!is_jsonl_path(Path::new("events.csv")));
        assert!(!is_jsonl_path(Path::new("events")));
    }
}
