use sentinel_core::ThreatType;

/// Base (mttd_sec, mttr_sec) per threat type, before policy multipliers.
/// The spec's "unknown threat type → {30, 120}" fallback is moot here:
/// `Rule::from_config` already rejects any threat_type string outside
/// this closed set at load time, so every Alert that reaches the
/// correlator carries one of these four.
pub fn base_timings(threat_type: ThreatType) -> (f64, f64) {
    match threat_type {
        ThreatType::CredentialAttack => (30.0, 120.0),
        ThreatType::AvailabilityAttack => (15.0, 180.0),
        ThreatType::IntegrityAttack => (60.0, 240.0),
        ThreatType::Outage => (10.0, 300.0),
    }
}
