use serde::{Deserialize, Serialize};
use std::fmt;

/// Total order over severities, low to critical. Comparisons (`max`, `Ord`)
/// are used directly by the detector and correlator instead of being
/// recomputed ad hoc at each call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Weight used by the correlator's impact-score formula.
    pub fn weight(self) -> f64 {
        match self {
            Severity::Low => 0.2,
            Severity::Medium => 0.4,
            Severity::High => 0.7,
            Severity::Critical => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(crate::Error::Parse(format!("unknown severity '{other}'"))),
        }
    }
}

/// Externally recognized threat families. Incident base MTTD/MTTR timings
/// and the policy modifier schema are both keyed on this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreatType {
    CredentialAttack,
    AvailabilityAttack,
    IntegrityAttack,
    Outage,
}

impl fmt::Display for ThreatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThreatType::CredentialAttack => "credential_attack",
            ThreatType::AvailabilityAttack => "availability_attack",
            ThreatType::IntegrityAttack => "integrity_attack",
            ThreatType::Outage => "outage",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ThreatType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credential_attack" => Ok(ThreatType::CredentialAttack),
            "availability_attack" => Ok(ThreatType::AvailabilityAttack),
            "integrity_attack" => Ok(ThreatType::IntegrityAttack),
            "outage" => Ok(ThreatType::Outage),
            other => Err(crate::Error::Parse(format!("unknown threat_type '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_is_total() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
        assert_eq!([Severity::Critical, Severity::Low].iter().max(), Some(&Severity::Critical));
    }

    #[test]
    fn severity_round_trips_through_str() {
        for s in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            assert_eq!(s.as_str().parse::<Severity>().unwrap(), s);
        }
    }
}
