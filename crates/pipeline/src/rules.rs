use sentinel_core::{Error, Result};
use sentinel_detector::{load_rules, Rule, RuleConfig};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize, Default)]
struct RulesFile {
    #[serde(default)]
    rules: Vec<RuleConfig>,
}

/// Load and parse `<config_dir>/rules.yaml`. A missing or malformed file
/// is fatal at startup; an individual rule with an unrecognized family or
/// invalid field is logged and dropped (`load_rules`), never fatal.
pub fn load_rules_file(config_dir: &Path) -> Result<Vec<Rule>> {
    let path = config_dir.join("rules.yaml");
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    let file: RulesFile =
        serde_yaml::from_str(&raw).map_err(|e| Error::Config(format!("invalid rules.yaml: {e}")))?;
    let rules = load_rules(file.rules);
    info!(count = rules.len(), "loaded rules");
    Ok(rules)
}
