use crate::interval::{merge_intervals, total_length};
use sentinel_core::{Incident, PolicyMetrics};

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// `compute(incidents, policy_name, horizon_sec) -> PolicyMetrics`. Pure
/// over its inputs; no side effects.
///
/// Downtime only counts incidents with severity high/critical and a
/// well-formed `detect_ts..recover_ts` interval (`recover_ts > detect_ts`);
/// everything else — MTTD/MTTR averages, severity/threat counts — is
/// computed over every incident regardless of severity.
pub fn compute(incidents: &[Incident], policy_name: &str, horizon_sec: f64) -> PolicyMetrics {
    if incidents.is_empty() {
        return PolicyMetrics::empty(policy_name);
    }

    let mut m = PolicyMetrics::empty(policy_name);
    m.incidents_total = incidents.len();

    for inc in incidents {
        *m.incidents_by_severity.entry(inc.severity.as_str().to_string()).or_insert(0) += 1;
        *m.incidents_by_threat.entry(inc.threat_type.clone()).or_insert(0) += 1;
    }

    let n = incidents.len() as f64;
    m.mean_mttd_min = round2(incidents.iter().map(|i| i.mttd_sec).sum::<f64>() / n / 60.0);
    m.mean_mttr_min = round2(incidents.iter().map(|i| i.mttr_sec).sum::<f64>() / n / 60.0);

    let downtime_intervals: Vec<(i64, i64)> = incidents
        .iter()
        .filter(|i| i.counts_toward_downtime())
        .map(|i| (i.detect_instant, i.recover_instant))
        .collect();
    let merged = merge_intervals(downtime_intervals);
    let total_downtime_sec = total_length(&merged) as f64;

    m.total_downtime_hr = round4(total_downtime_sec / 3600.0);
    m.availability_pct = if horizon_sec <= 0.0 {
        100.0
    } else {
        round2((1.0 - total_downtime_sec / horizon_sec) * 100.0).max(0.0).min(100.0)
    };

    m
}
