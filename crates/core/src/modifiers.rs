use crate::ThreatType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The modifier schema is enumerated and fixed-shape, with a
/// default-constructed neutral element (all multipliers `1.0`) rather
/// than being recomputed ad hoc wherever a policy is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ThreatModifiers {
    #[serde(default = "one")]
    pub window_multiplier: f64,
    #[serde(default = "one")]
    pub threshold_multiplier: f64,
    #[serde(default = "one")]
    pub mttd_multiplier: f64,
    #[serde(default = "one")]
    pub mttr_multiplier: f64,
    #[serde(default = "one")]
    pub impact_multiplier: f64,
}

fn one() -> f64 {
    1.0
}

impl Default for ThreatModifiers {
    fn default() -> Self {
        ThreatModifiers {
            window_multiplier: 1.0,
            threshold_multiplier: 1.0,
            mttd_multiplier: 1.0,
            mttr_multiplier: 1.0,
            impact_multiplier: 1.0,
        }
    }
}

/// Per-threat_type modifier map applied to Rules at detection time and
/// to Incidents at correlation time. Missing threat types default to
/// the neutral element.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PolicyModifiers(pub HashMap<ThreatType, ThreatModifiers>);

impl PolicyModifiers {
    pub fn get(&self, threat_type: ThreatType) -> ThreatModifiers {
        self.0.get(&threat_type).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_threat_type_is_neutral() {
        let m = PolicyModifiers::default();
        assert_eq!(m.get(ThreatType::Outage), ThreatModifiers::default());
    }
}
