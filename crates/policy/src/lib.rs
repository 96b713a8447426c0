//! Declarative policy configuration: per-threat-type modifiers for the
//! detector/correlator, and control-set effectiveness ranking.

mod config;
mod engine;

use sentinel_core::{Error, Result};
use std::path::Path;
use tracing::info;

pub use config::{ControlConfig, PoliciesConfig, PolicyConfig};
pub use engine::{get_modifiers, list_policy_names, rank_controls, ControlRanking};

/// Load and parse `<config_dir>/policies.yaml`. A missing or malformed
/// file is a fatal configuration error — the run never starts without it.
pub fn load_policies(config_dir: &Path) -> Result<PoliciesConfig> {
    let path = config_dir.join("policies.yaml");
    let raw = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    let cfg = config::parse_policies(&raw)?;
    info!(count = cfg.order.len(), policies = ?cfg.order, "loaded policies");
    Ok(cfg)
}
