use crate::Error;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// A parsed instant, carried alongside (never instead of) the original
/// string so CSV/JSON emission is lossless and math stays in epoch seconds.
pub type Instant = i64;

/// Parse an ISO-8601 timestamp at second precision. Both a trailing `Z`
/// and an explicit `+00:00` offset are accepted on input; only `Z` is
/// ever produced on output (see `format_instant`).
pub fn parse_timestamp(raw: &str) -> Result<Instant, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::Parse("empty timestamp".into()));
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).timestamp())
        .map_err(|e| Error::Parse(format!("invalid timestamp '{raw}': {e}")))
}

/// Re-format a parsed instant for emission. Always UTC with a `Z` suffix,
/// second precision.
pub fn format_instant(instant: Instant) -> String {
    Utc.timestamp_opt(instant, 0)
        .single()
        .unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap())
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_z_and_offset_suffixes() {
        let a = parse_timestamp("2026-02-26T10:00:00Z").unwrap();
        let b = parse_timestamp("2026-02-26T10:00:00+00:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trips_to_z_suffix() {
        let t = parse_timestamp("2026-02-26T10:00:00Z").unwrap();
        assert_eq!(format_instant(t), "2026-02-26T10:00:00Z");
    }

    #[test]
    fn rejects_empty_timestamp() {
        assert!(parse_timestamp("").is_err());
    }
}
