use sentinel_core::Event;

const MIN_HORIZON_SEC: f64 = 3600.0;

/// The horizon rule from the pipeline contract: an explicit
/// `horizon_days > 0` wins; otherwise the horizon is derived from the
/// event timespan (floored at one hour); with fewer than two events, the
/// floor itself (one hour) is the horizon.
pub fn resolve_horizon_sec(events: &[Event], horizon_days: Option<f64>) -> f64 {
    if let Some(days) = horizon_days {
        if days > 0.0 {
            return days * 86_400.0;
        }
    }
    if events.len() >= 2 {
        let span = (events.last().unwrap().ts - events.first().unwrap().ts) as f64;
        span.max(MIN_HORIZON_SEC)
    } else {
        MIN_HORIZON_SEC
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Event;

    fn event(ts: &str) -> Event {
        Event::from_fields(ts, "s", "c", "telemetry_read", "", "", "", "", "", "low", "", "").unwrap()
    }

    #[test]
    fn explicit_horizon_days_wins() {
        let events = vec![event("2026-02-26T10:00:00Z")];
        assert_eq!(resolve_horizon_sec(&events, Some(2.0)), 2.0 * 86_400.0);
    }

    #[test]
    fn non_positive_horizon_days_falls_through() {
        let events = vec![event("2026-02-26T10:00:00Z")];
        assert_eq!(resolve_horizon_sec(&events, Some(0.0)), MIN_HORIZON_SEC);
    }

    #[test]
    fn derives_from_event_span_with_one_hour_floor() {
        let events = vec![event("2026-02-26T10:00:00Z"), event("2026-02-26T10:10:00Z")];
        assert_eq!(resolve_horizon_sec(&events, None), MIN_HORIZON_SEC);
    }

    #[test]
    fn derives_from_event_span_when_longer_than_floor() {
        let events = vec![event("2026-02-26T00:00:00Z"), event("2026-02-27T00:00:00Z")];
        assert_eq!(resolve_horizon_sec(&events, None), 86_400.0);
    }

    #[test]
    fn fewer_than_two_events_uses_floor() {
        let events = vec![event("2026-02-26T10:00:00Z")];
        assert_eq!(resolve_horizon_sec(&events, None), MIN_HORIZON_SEC);
        assert_eq!(resolve_horizon_sec(&[], None), MIN_HORIZON_SEC);
    }
}
