use crate::horizon::resolve_horizon_sec;
use crate::load::load_events;
use crate::report::{alerts_csv, atomic_write, incidents_csv, report_html, report_txt, results_csv};
use crate::rules::load_rules_file;
use rayon::prelude::*;
use sentinel_core::{Alert, Error, Event, Incident, PolicyMetrics, Result};
use sentinel_detector::Rule;
use sentinel_policy::{get_modifiers, list_policy_names, rank_controls, ControlRanking, PoliciesConfig};
use std::path::Path;
use tracing::{info, warn};

/// Everything one analysis cycle needs that does not change between
/// watch-mode ticks: the loaded rules and policy configuration. Events
/// are passed separately since they grow over the life of a watch run.
pub struct AnalysisInputs {
    pub rules: Vec<Rule>,
    pub policies: PoliciesConfig,
    pub selected: Vec<String>,
}

impl AnalysisInputs {
    pub fn load(config_dir: &Path, requested_policies: &[String]) -> Result<Self> {
        let rules = load_rules_file(config_dir)?;
        let policies = sentinel_policy::load_policies(config_dir)?;
        let available = list_policy_names(&policies);

        let selected = if requested_policies.is_empty() || requested_policies == ["all"] {
            available
        } else {
            let mut missing = Vec::new();
            let mut selected = Vec::new();
            for name in requested_policies {
                if available.contains(name) {
                    selected.push(name.clone());
                } else {
                    missing.push(name.clone());
                }
            }
            if !missing.is_empty() {
                warn!(unknown = ?missing, "unknown policies ignored");
            }
            selected
        };

        Ok(AnalysisInputs { rules, policies, selected })
    }
}

/// Result of running the detect→correlate→metrics chain for every
/// selected policy, in selection order.
pub struct AnalysisResult {
    pub alerts: Vec<(String, Vec<Alert>)>,
    pub incidents: Vec<(String, Vec<Incident>)>,
    pub metrics: Vec<PolicyMetrics>,
    pub control_ranking: Vec<ControlRanking>,
}

/// Run the full chain for every selected policy. Policies only read the
/// shared immutable `events`/`inputs` and share no mutable state, so
/// they run in parallel (`rayon`); results are collected indexed by
/// selection order rather than completion order to keep the output
/// deterministic (§5).
pub fn analyze(events: &[Event], inputs: &AnalysisInputs, horizon_sec: f64) -> AnalysisResult {
    let per_policy: Vec<(String, Vec<Alert>, Vec<Incident>, PolicyMetrics)> = inputs
        .selected
        .par_iter()
        .map(|name| {
            let modifiers = get_modifiers(&inputs.policies, name);
            let alerts = sentinel_detector::detect(events, &inputs.rules, &modifiers);
            let incidents = sentinel_correlator::correlate(&alerts, name, &modifiers);
            let metrics = sentinel_metrics::compute(&incidents, name, horizon_sec);
            (name.clone(), alerts, incidents, metrics)
        })
        .collect();

    let mut alerts = Vec::with_capacity(per_policy.len());
    let mut incidents = Vec::with_capacity(per_policy.len());
    let mut metrics = Vec::with_capacity(per_policy.len());
    for (name, a, i, m) in per_policy {
        alerts.push((name.clone(), a));
        incidents.push((name, i));
        metrics.push(m);
    }
    let control_ranking = rank_controls(&inputs.policies, &inputs.selected);

    AnalysisResult { alerts, incidents, metrics, control_ranking }
}

/// Write `results.csv`, `incidents.csv`, `report.txt`, `report.html`
/// (and per-policy `alerts.csv` files) into `out_dir`, each atomically.
pub fn write_outputs(out_dir: &Path, result: &AnalysisResult) -> std::io::Result<()> {
    atomic_write(&out_dir.join("results.csv"), &results_csv(&result.metrics))?;

    let all_incidents: Vec<Incident> = result.incidents.iter().flat_map(|(_, v)| v.clone()).collect();
    atomic_write(&out_dir.join("incidents.csv"), &incidents_csv(&all_incidents))?;

    atomic_write(&out_dir.join("report.txt"), &report_txt(&result.metrics, &result.control_ranking))?;
    atomic_write(&out_dir.join("report.html"), &report_html(&result.metrics, &result.control_ranking))?;

    for (policy, alerts) in &result.alerts {
        atomic_write(&out_dir.join(format!("alerts_{policy}.csv")), &alerts_csv(alerts))?;
    }
    Ok(())
}

/// Batch mode: load events once, run the chain for every selected
/// policy, write outputs, return.
pub fn run_batch(
    input_path: &Path,
    out_dir: &Path,
    config_dir: &Path,
    requested_policies: &[String],
    horizon_days: Option<f64>,
) -> Result<AnalysisResult> {
    let mut events = load_events(input_path).map_err(Error::Io)?;
    events.sort_by_key(|e| e.ts);
    if events.is_empty() {
        warn!(path = %input_path.display(), "no events loaded — nothing to analyse");
    }
    let inputs = AnalysisInputs::load(config_dir, requested_policies)?;
    let horizon_sec = resolve_horizon_sec(&events, horizon_days);

    let result = analyze(&events, &inputs, horizon_sec);
    for m in &result.metrics {
        info!(policy = %m.policy, availability = m.availability_pct, downtime_hr = m.total_downtime_hr, "policy metrics");
    }

    write_outputs(out_dir, &result).map_err(Error::Io)?;
    info!(out_dir = %out_dir.display(), "pipeline complete");
    Ok(result)
}
