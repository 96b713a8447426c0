//! Wires the detector, correlator, metrics engine and policy engine
//! end-to-end: event/config loading, per-policy execution, report
//! writing, and the watch/follow loop described in `spec.md` §4.5.

mod horizon;
mod load;
mod report;
mod rules;
mod run;
mod watch;

pub use horizon::resolve_horizon_sec;
pub use load::{is_jsonl_path, load_events, load_events_csv, load_events_jsonl, parse_appended_jsonl, EVENT_COLUMNS};
pub use report::{alerts_csv, atomic_write, incidents_csv, report_html, report_txt, results_csv};
pub use rules::load_rules_file;
pub use run::{analyze, run_batch, write_outputs, AnalysisInputs, AnalysisResult};
pub use watch::{run_watch, WatchState};
