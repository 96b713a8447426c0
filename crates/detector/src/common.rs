use sentinel_core::Event;
use std::collections::BTreeSet;

/// The `event_ids` field prefers explicit correlation ids (so the
/// correlator's COR-tag grouping phase can see them) and falls back to
/// the member events' raw timestamps when none are present.
pub fn event_ids_for(events: &[&Event]) -> String {
    let cor_ids: BTreeSet<&str> = events
        .iter()
        .map(|e| e.correlation_id.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if !cor_ids.is_empty() {
        cor_ids.into_iter().collect::<Vec<_>>().join(";")
    } else {
        events.iter().map(|e| e.timestamp.as_str()).collect::<Vec<_>>().join(";")
    }
}

/// Monotonic `ALR-NNNN` id sequence shared across one detector run.
pub struct AlertIdGen {
    next: u32,
}

impl AlertIdGen {
    pub fn new() -> Self {
        AlertIdGen { next: 1 }
    }

    pub fn next_id(&mut self) -> String {
        let id = format!("ALR-{:04}", self.next);
        self.next += 1;
        id
    }
}

impl Default for AlertIdGen {
    fn default() -> Self {
        Self::new()
    }
}
