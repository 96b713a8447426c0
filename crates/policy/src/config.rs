use sentinel_core::{Error, PolicyModifiers, Result};
use std::collections::HashMap;

/// One control's configuration. A control is "enabled" iff its value is a
/// structured (mapping) object with an `enabled` field equal to `true` —
/// not every control entry is required to be a bare boolean, so the raw
/// YAML value is kept alongside the parsed `enabled` flag.
#[derive(Debug, Clone)]
pub struct ControlConfig {
    pub enabled: bool,
}

impl ControlConfig {
    fn from_value(value: &serde_yaml::Value) -> Self {
        let enabled = value
            .as_mapping()
            .and_then(|m| m.get(serde_yaml::Value::String("enabled".to_string())))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        ControlConfig { enabled }
    }
}

/// One named policy: its control set and per-threat-type modifiers.
#[derive(Debug, Clone, Default)]
pub struct PolicyConfig {
    pub controls: HashMap<String, ControlConfig>,
    pub modifiers: PolicyModifiers,
}

/// All policies declared in `policies.yaml`, in file declaration order —
/// `list_policy_names` and `rank_controls` both depend on this order being
/// preserved rather than re-sorted alphabetically.
#[derive(Debug, Clone, Default)]
pub struct PoliciesConfig {
    pub order: Vec<String>,
    pub policies: HashMap<String, PolicyConfig>,
}

impl PoliciesConfig {
    pub fn get(&self, name: &str) -> Option<&PolicyConfig> {
        self.policies.get(name)
    }
}

/// Parse `policies.yaml`'s raw text into a [`PoliciesConfig`]. Declaration
/// order of the top-level `policies` mapping is preserved (`serde_yaml`
/// backs its `Mapping` with an order-preserving map), which is what lets
/// `list_policy_names` return policies in the order an operator wrote
/// them rather than alphabetically.
pub fn parse_policies(raw: &str) -> Result<PoliciesConfig> {
    let doc: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| Error::Config(format!("invalid policies.yaml: {e}")))?;

    let policies_value = doc
        .as_mapping()
        .and_then(|m| m.get(serde_yaml::Value::String("policies".to_string())))
        .cloned()
        .unwrap_or(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));

    let mapping = policies_value
        .as_mapping()
        .ok_or_else(|| Error::Config("policies.yaml: 'policies' must be a mapping".into()))?;

    let mut order = Vec::with_capacity(mapping.len());
    let mut policies = HashMap::with_capacity(mapping.len());

    for (key, value) in mapping {
        let name = key
            .as_str()
            .ok_or_else(|| Error::Config("policies.yaml: policy name must be a string".into()))?
            .to_string();

        let controls = value
            .as_mapping()
            .and_then(|m| m.get(serde_yaml::Value::String("controls".to_string())))
            .and_then(|v| v.as_mapping())
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), ControlConfig::from_value(v))))
                    .collect()
            })
            .unwrap_or_default();

        let modifiers_value = value
            .as_mapping()
            .and_then(|m| m.get(serde_yaml::Value::String("modifiers".to_string())))
            .cloned()
            .unwrap_or(serde_yaml::Value::Mapping(serde_yaml::Mapping::new()));
        let modifiers: PolicyModifiers = serde_yaml::from_value(modifiers_value)
            .map_err(|e| Error::Config(format!("policies.yaml: policy '{name}' has invalid modifiers: {e}")))?;

        order.push(name.clone());
        policies.insert(name, PolicyConfig { controls, modifiers });
    }

    Ok(PoliciesConfig { order, policies })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
policies:
  baseline:
    controls:
      mfa:
        enabled: false
    modifiers:
      credential_attack:
        mttd_multiplier: 1.0
        mttr_multiplier: 1.0
  standard:
    controls:
      mfa:
        enabled: true
      waf:
        enabled: true
    modifiers:
      credential_attack:
        mttd_multiplier: 0.5
        mttr_multiplier: 0.7
"#;

    #[test]
    fn preserves_declaration_order() {
        let cfg = parse_policies(SAMPLE).unwrap();
        assert_eq!(cfg.order, vec!["baseline", "standard"]);
    }

    #[test]
    fn enabled_controls_are_those_with_enabled_true() {
        let cfg = parse_policies(SAMPLE).unwrap();
        let standard = cfg.get("standard").unwrap();
        assert!(standard.controls["mfa"].enabled);
        assert!(standard.controls["waf"].enabled);
        assert!(!cfg.get("baseline").unwrap().controls["mfa"].enabled);
    }

    #[test]
    fn missing_policies_key_yields_empty_config() {
        let cfg = parse_policies("other_key: 1\n").unwrap();
        assert!(cfg.order.is_empty());
    }
}
