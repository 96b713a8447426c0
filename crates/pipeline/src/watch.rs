use crate::horizon::resolve_horizon_sec;
use crate::load::{is_jsonl_path, parse_appended_jsonl};
use crate::run::{analyze, write_outputs, AnalysisInputs};
use sentinel_core::{Error, Event, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// The single piece of mutable state the watch loop owns: the byte
/// offset already consumed from `path`, and the event list accumulated
/// from it so far. Re-running the chain from scratch every tick would
/// be wasteful and would also throw away alerts whose triggering events
/// have since scrolled out of any bounded buffer — instead each tick
/// only parses newly appended bytes and extends the accumulated list.
pub struct WatchState {
    path: PathBuf,
    offset: u64,
    events: Vec<Event>,
}

impl WatchState {
    pub fn new(path: &Path) -> Self {
        WatchState { path: path.to_path_buf(), offset: 0, events: Vec::new() }
    }

    /// Read and parse any complete lines appended to the input file
    /// since the last call, extending `events`. Returns the number of
    /// new events parsed. A trailing partial line is left at `offset`
    /// so it is re-read, completed, on the next poll.
    fn poll_once(&mut self) -> std::io::Result<usize> {
        let mut file = std::fs::File::open(&self.path)?;
        let len = file.metadata()?.len();
        if len < self.offset {
            // File was truncated/replaced; restart the tail from the top.
            warn!(path = %self.path.display(), "input file shrank — restarting tail from offset 0");
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(0);
        }
        file.seek(SeekFrom::Start(self.offset))?;
        let mut appended = String::new();
        file.read_to_string(&mut appended)?;

        let (new_events, consumed) = parse_appended_jsonl(&appended);
        self.offset += consumed as u64;
        let new_count = new_events.len();
        self.events.extend(new_events);
        Ok(new_count)
    }
}

/// Run the detect→correlate→metrics chain in a cooperative polling loop
/// over an append-only JSONL input, rewriting outputs atomically on each
/// tick. Only JSONL inputs support resumable tailing (an append-only CSV
/// has no stable mid-file record boundary to resume from), so `--watch`
/// is rejected for any other extension by the caller before this runs.
///
/// Terminates when `cancel` is observed set, checked both before each
/// sleep and before starting a new analysis cycle. A failure inside one
/// cycle (I/O error, parse panic boundary) is logged and the loop
/// proceeds to the next tick rather than tearing down.
pub async fn run_watch(
    input_path: &Path,
    out_dir: &Path,
    inputs: &AnalysisInputs,
    horizon_days: Option<f64>,
    poll_interval: Duration,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    if !is_jsonl_path(input_path) {
        return Err(Error::Config("watch mode requires a .jsonl/.ndjson input".into()));
    }

    let mut state = WatchState::new(input_path);
    info!(path = %input_path.display(), poll_ms = poll_interval.as_millis(), "starting watch loop");

    loop {
        if cancel.load(Ordering::SeqCst) {
            info!("watch loop cancelled");
            return Ok(());
        }

        match run_cycle(&mut state, out_dir, inputs, horizon_days) {
            Ok(new_count) if new_count > 0 => {
                info!(new_events = new_count, total_events = state.events.len(), "watch cycle refreshed outputs");
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "watch cycle failed — continuing to next poll"),
        }

        if cancel.load(Ordering::SeqCst) {
            return Ok(());
        }
        tokio::time::sleep(poll_interval).await;
    }
}

fn run_cycle(
    state: &mut WatchState,
    out_dir: &Path,
    inputs: &AnalysisInputs,
    horizon_days: Option<f64>,
) -> std::io::Result<usize> {
    let new_count = state.poll_once()?;
    if new_count == 0 && !state.events.is_empty() {
        return Ok(0);
    }
    state.events.sort_by_key(|e| e.ts);
    let horizon_sec = resolve_horizon_sec(&state.events, horizon_days);
    let result = analyze(&state.events, inputs, horizon_sec);
    write_outputs(out_dir, &result)?;
    Ok(new_count)
}
