//! GridSentinel resilience analyzer — command-line entry point.
//!
//! Wires `sentinel-pipeline`'s batch and watch modes to the invocation
//! contract described in the interface spec: input path, output
//! directory, policy selection, config directory, optional horizon and
//! watch flag.
//!
//! ```text
//! gridsentinel --input events.csv --out-dir out --policies all --config-dir config
//! gridsentinel --input events.jsonl --watch --poll-interval-ms 500
//! ```

use clap::Parser;
use colored::*;
use sentinel_pipeline::{run_batch, run_watch, AnalysisInputs};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "gridsentinel")]
#[command(version)]
#[command(about = "SIEM-style resilience analyzer for simulated smart-energy infrastructure")]
struct Cli {
    /// Path to the event stream (.csv, or .jsonl/.ndjson for watch mode)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory outputs (results.csv, incidents.csv, report.txt/html) are written to
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,

    /// Comma-separated policy names, or "all"
    #[arg(short, long, default_value = "all")]
    policies: String,

    /// Directory containing rules.yaml and policies.yaml
    #[arg(short, long, default_value = "config")]
    config_dir: PathBuf,

    /// Fixed horizon in days; derived from the event span when unset
    #[arg(long)]
    horizon_days: Option<f64>,

    /// Seed accepted for compatibility with the full system's emulator;
    /// unused by this analyzer core
    #[arg(long)]
    seed: Option<u64>,

    /// Re-run the full chain on newly appended events instead of exiting
    /// after one pass (JSONL input only)
    #[arg(long)]
    watch: bool,

    /// Poll interval for watch mode, in milliseconds
    #[arg(long, default_value_t = 1000)]
    poll_interval_ms: u64,

    /// tracing-subscriber env-filter level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_logging(log_level: &str) {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", log_level);
    }
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_target(false).init();
}

fn selected_policies(raw: &str) -> Vec<String> {
    if raw.trim() == "all" {
        vec!["all".to_string()]
    } else {
        raw.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Some(seed) = cli.seed {
        info!(seed, "seed accepted, unused by the analyzer core (emulator-only parameter)");
    }

    let result = tokio::runtime::Runtime::new().expect("failed to start tokio runtime").block_on(run(cli));

    match result {
        Ok(()) => {
            println!("{}", "analysis complete".green().bold());
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let policies = selected_policies(&cli.policies);

    if cli.watch {
        let inputs = AnalysisInputs::load(&cli.config_dir, &policies)?;
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, cancelling watch loop");
                cancel_for_signal.store(true, Ordering::SeqCst);
            }
        });

        run_watch(&cli.input, &cli.out_dir, &inputs, cli.horizon_days, Duration::from_millis(cli.poll_interval_ms), cancel)
            .await?;
    } else {
        run_batch(&cli.input, &cli.out_dir, &cli.config_dir, &policies, cli.horizon_days)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_keyword_is_not_split_on_commas() {
        assert_eq!(selected_policies("all"), vec!["all".to_string()]);
    }

    #[test]
    fn comma_list_is_trimmed_and_split() {
        assert_eq!(selected_policies("baseline, standard ,strict"), vec!["baseline", "standard", "strict"]);
    }
}
