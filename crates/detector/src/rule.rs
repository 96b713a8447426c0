use sentinel_core::{Error, EventKind, Result, Severity, ThreatType};
use serde::Deserialize;
use std::collections::HashMap;

/// Closed set of detection algorithms. Parsed once from the rule id's
/// prefix at load time; the prefix itself is retained only as the
/// external identifier (`Rule::id`), never re-inspected at match time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFamily {
    BruteForce,
    Ddos,
    Spoof,
    UnauthorizedCmd,
    Outage,
}

impl RuleFamily {
    fn from_id(id: &str) -> Option<Self> {
        if id.starts_with("RULE-BF-") {
            Some(RuleFamily::BruteForce)
        } else if id.starts_with("RULE-DDOS-") {
            Some(RuleFamily::Ddos)
        } else if id.starts_with("RULE-SPOOF-") {
            Some(RuleFamily::Spoof)
        } else if id.starts_with("RULE-UCMD-") {
            Some(RuleFamily::UnauthorizedCmd)
        } else if id.starts_with("RULE-OUT-") {
            Some(RuleFamily::Outage)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoundsConfig {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeverityOverrideEntry {
    pub value: String,
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MatchConfig {
    pub event: Option<String>,
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Allowed values for the matched event (e.g. outage's allowed
    /// `service_status` values).
    pub values: Option<Vec<String>>,
    /// The actor whitelist: a command is unauthorized when its actor is
    /// not in this set (hence the name — it is the set tested against
    /// in the "actor not in ..." condition, not a blacklist).
    pub actor_not_in: Option<Vec<String>>,
}

/// Raw, as-configured rule record — one entry of `rules.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub threat_type: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(rename = "match", default)]
    pub match_: MatchConfig,
    pub window_sec: u64,
    pub threshold: u64,
    pub severity: String,
    pub confidence: f64,
    pub bounds: Option<HashMap<String, BoundsConfig>>,
    pub delta: Option<HashMap<String, f64>>,
    pub severity_override: Option<Vec<SeverityOverrideEntry>>,
    #[serde(default)]
    pub response_hint: String,
}

fn default_true() -> bool {
    true
}

/// A fully validated, ready-to-evaluate rule. Declarative; read once per
/// run and never mutated.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub family: RuleFamily,
    pub threat_type: ThreatType,
    pub enabled: bool,
    pub match_event: Option<EventKind>,
    pub allowed_values: Vec<String>,
    pub allowed_actors: Vec<String>,
    pub window_sec: u64,
    pub threshold: u64,
    pub severity: Severity,
    pub confidence: f64,
    pub bounds: HashMap<String, (f64, f64)>,
    pub delta: HashMap<String, f64>,
    pub severity_override: Vec<(String, Severity)>,
    pub response_hint: String,
}

impl Rule {
    pub fn from_config(cfg: RuleConfig) -> Result<Self> {
        let family = RuleFamily::from_id(&cfg.id)
            .ok_or_else(|| Error::Config(format!("unrecognized rule family in id '{}'", cfg.id)))?;
        let threat_type: ThreatType = cfg.threat_type.parse()?;
        let severity: Severity = cfg.severity.parse()?;
        let bounds = cfg
            .bounds
            .unwrap_or_default()
            .into_iter()
            .map(|(k, b)| (k, (b.min, b.max)))
            .collect();
        let delta = cfg.delta.unwrap_or_default();
        let severity_override = cfg
            .severity_override
            .unwrap_or_default()
            .into_iter()
            .map(|e| Ok((e.value, e.severity.parse::<Severity>()?)))
            .collect::<Result<Vec<_>>>()?;
        let allowed_actors = cfg
            .match_
            .actor_not_in
            .unwrap_or_default()
            .into_iter()
            .map(|a| a.trim().to_ascii_lowercase())
            .collect();

        Ok(Rule {
            id: cfg.id,
            family,
            threat_type,
            enabled: cfg.enabled,
            match_event: cfg.match_.event.as_deref().map(EventKind::from),
            allowed_values: cfg.match_.values.unwrap_or_default(),
            allowed_actors,
            window_sec: cfg.window_sec,
            threshold: cfg.threshold.max(1),
            severity,
            confidence: cfg.confidence,
            bounds,
            delta,
            severity_override,
            response_hint: cfg.response_hint,
        })
    }

    /// Window length and threshold after the policy's per-threat
    /// multipliers are applied, per the detector contract.
    pub fn effective_window_and_threshold(&self, window_mult: f64, threshold_mult: f64) -> (i64, usize) {
        let window = (self.window_sec as f64 * window_mult).round() as i64;
        let threshold = ((self.threshold as f64 * threshold_mult).round() as i64).max(1) as usize;
        (window, threshold)
    }

    pub fn severity_for_value(&self, value: &str) -> Option<Severity> {
        self.severity_override
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, s)| *s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Rule {
        let cfg: RuleConfig = serde_yaml::from_str(yaml).unwrap();
        Rule::from_config(cfg).unwrap()
    }

    #[test]
    fn dispatches_family_from_id_prefix() {
        let r = parse(
            "id: RULE-BF-001\nthreat_type: credential_attack\nwindow_sec: 60\nthreshold: 5\nseverity: high\nconfidence: 0.8\n",
        );
        assert_eq!(r.family, RuleFamily::BruteForce);
    }

    #[test]
    fn threshold_floor_is_one() {
        let r = parse(
            "id: RULE-OUT-001\nthreat_type: outage\nwindow_sec: 10\nthreshold: 1\nseverity: high\nconfidence: 0.8\n",
        );
        let (_, t) = r.effective_window_and_threshold(1.0, 0.01);
        assert_eq!(t, 1);
    }

    #[test]
    fn unrecognized_prefix_is_rejected() {
        let cfg: RuleConfig = serde_yaml::from_str(
            "id: RULE-ZZZ-001\nthreat_type: outage\nwindow_sec: 10\nthreshold: 1\nseverity: high\nconfidence: 0.8\n",
        )
        .unwrap();
        assert!(Rule::from_config(cfg).is_err());
    }
}
