use sentinel_core::{Incident, PolicyMetrics, ALERT_CSV_COLUMNS, INCIDENT_CSV_COLUMNS};
use sentinel_policy::ControlRanking;
use std::io;
use std::path::Path;

/// Write `content` to `path` atomically: write to a sibling temp file in
/// the same directory, then rename into place, so a concurrent reader
/// (e.g. a dashboard polling `results.csv`) never observes a
/// half-written file.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("out");
    let tmp_path = dir.join(format!(".{file_name}.tmp"));
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

const RESULTS_CSV_COLUMNS: [&str; 14] = [
    "policy",
    "availability_pct",
    "total_downtime_hr",
    "mean_mttd_min",
    "mean_mttr_min",
    "incidents_total",
    "incidents_critical",
    "incidents_high",
    "incidents_medium",
    "incidents_low",
    "by_credential_attack",
    "by_availability_attack",
    "by_integrity_attack",
    "by_outage",
];

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render `results.csv`: one row per policy, in the fixed column order
/// from §6 of the interface contract.
pub fn results_csv(metrics: &[PolicyMetrics]) -> String {
    let mut lines = vec![RESULTS_CSV_COLUMNS.join(",")];
    for m in metrics {
        let sev = &m.incidents_by_severity;
        let thr = &m.incidents_by_threat;
        lines.push(
            [
                m.policy.clone(),
                format!("{:.2}", m.availability_pct),
                format!("{:.4}", m.total_downtime_hr),
                format!("{:.2}", m.mean_mttd_min),
                format!("{:.2}", m.mean_mttr_min),
                m.incidents_total.to_string(),
                sev.get("critical").copied().unwrap_or(0).to_string(),
                sev.get("high").copied().unwrap_or(0).to_string(),
                sev.get("medium").copied().unwrap_or(0).to_string(),
                sev.get("low").copied().unwrap_or(0).to_string(),
                thr.get("credential_attack").copied().unwrap_or(0).to_string(),
                thr.get("availability_attack").copied().unwrap_or(0).to_string(),
                thr.get("integrity_attack").copied().unwrap_or(0).to_string(),
                thr.get("outage").copied().unwrap_or(0).to_string(),
            ]
            .join(","),
        );
    }
    lines.join("\n") + "\n"
}

/// Render `incidents.csv`: one row per incident, in the fixed column
/// order `sentinel_core::INCIDENT_CSV_COLUMNS`.
pub fn incidents_csv(incidents: &[Incident]) -> String {
    let mut lines = vec![INCIDENT_CSV_COLUMNS.join(",")];
    for inc in incidents {
        lines.push(
            [
                inc.incident_id.clone(),
                inc.policy.clone(),
                inc.threat_type.clone(),
                inc.severity.as_str().to_string(),
                csv_escape(&inc.component),
                inc.event_count.to_string(),
                inc.start_ts.clone(),
                inc.detect_ts.clone(),
                inc.recover_ts.clone(),
                format!("{:.0}", inc.mttd_sec),
                format!("{:.0}", inc.mttr_sec),
                format!("{:.4}", inc.impact_score),
                csv_escape(&inc.description),
                csv_escape(&inc.response_action),
            ]
            .join(","),
        );
    }
    lines.join("\n") + "\n"
}

/// Render `alerts.csv` for a single policy run. Not one of §6's two
/// mandated output files, but useful for debugging a detector-only run;
/// shares `sentinel_core::ALERT_CSV_COLUMNS`.
pub fn alerts_csv(alerts: &[sentinel_core::Alert]) -> String {
    let mut lines = vec![ALERT_CSV_COLUMNS.join(",")];
    for a in alerts {
        lines.push(
            [
                a.alert_id.clone(),
                a.rule_id.clone(),
                a.threat_type.clone(),
                a.severity.as_str().to_string(),
                format!("{:.2}", a.confidence),
                a.timestamp.clone(),
                csv_escape(&a.component),
                csv_escape(&a.source),
                csv_escape(&a.description),
                a.event_count.to_string(),
                csv_escape(&a.response_hint),
            ]
            .join(","),
        );
    }
    lines.join("\n") + "\n"
}

/// Human-readable plain-text summary: peripheral, not part of the tested
/// core contract (§4.6).
pub fn report_txt(metrics: &[PolicyMetrics], control_ranking: &[ControlRanking]) -> String {
    let mut out = String::new();
    out.push_str("GridSentinel resilience report\n");
    out.push_str("===============================\n\n");
    for m in metrics {
        out.push_str(&format!(
            "policy: {}\n  availability: {:.2}%\n  downtime: {:.4}h\n  mean MTTD: {:.2}min\n  mean MTTR: {:.2}min\n  incidents: {}\n\n",
            m.policy, m.availability_pct, m.total_downtime_hr, m.mean_mttd_min, m.mean_mttr_min, m.incidents_total,
        ));
    }
    out.push_str("control ranking (most effective first)\n");
    out.push_str("---------------------------------------\n");
    for r in control_ranking {
        out.push_str(&format!(
            "{:<12} effectiveness={:.3} avg_mttd_mult={:.3} avg_mttr_mult={:.3} controls=[{}]\n",
            r.policy,
            r.effectiveness,
            r.avg_mttd_mult,
            r.avg_mttr_mult,
            r.enabled_controls.join(", "),
        ));
    }
    out
}

/// Human-readable HTML summary: peripheral, not part of the tested core
/// contract. Minimal inline-styled table, no client-side scripting.
pub fn report_html(metrics: &[PolicyMetrics], control_ranking: &[ControlRanking]) -> String {
    let mut rows = String::new();
    for m in metrics {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}%</td><td>{:.4}h</td><td>{:.2}min</td><td>{:.2}min</td><td>{}</td></tr>\n",
            m.policy, m.availability_pct, m.total_downtime_hr, m.mean_mttd_min, m.mean_mttr_min, m.incidents_total,
        ));
    }
    let mut ranking_rows = String::new();
    for r in control_ranking {
        ranking_rows.push_str(&format!(
            "<tr><td>{}</td><td>{:.3}</td><td>{}</td></tr>\n",
            r.policy,
            r.effectiveness,
            r.enabled_controls.join(", "),
        ));
    }
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>GridSentinel report</title></head>\n<body>\n<h1>GridSentinel resilience report</h1>\n<table border=\"1\" cellpadding=\"4\">\n<tr><th>policy</th><th>availability</th><th>downtime</th><th>mean MTTD</th><th>mean MTTR</th><th>incidents</th></tr>\n{rows}</table>\n<h2>control ranking</h2>\n<table border=\"1\" cellpadding=\"4\">\n<tr><th>policy</th><th>effectiveness</th><th>enabled controls</th></tr>\n{ranking_rows}</table>\n</body></html>\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::PolicyMetrics;

    #[test]
    fn results_csv_header_matches_contract() {
        let csv = results_csv(&[]);
        assert_eq!(csv.lines().next().unwrap(), RESULTS_CSV_COLUMNS.join(","));
    }

    #[test]
    fn results_csv_renders_one_row_per_policy() {
        let csv = results_csv(&[PolicyMetrics::empty("baseline"), PolicyMetrics::empty("standard")]);
        assert_eq!(csv.lines().count(), 3);
    }

    #[test]
    fn atomic_write_round_trips_via_temp_rename() {
        let dir = std::env::temp_dir().join(format!("sentinel-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.csv");
        atomic_write(&path, "a,b\n1,2\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1,2\n");
        std::fs::remove_dir_all(&dir).ok();
    }
}
