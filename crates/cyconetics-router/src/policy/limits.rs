//! Compiled policy constants. Every decision carries the lineage stamp and
//! ksrs triple defined here.

use cyconetics_core::ksr::{KsrBands, KsrDefaults, Ksrs, NormalizedScore, RawScore};

use crate::config::PolicySection;

/// Absolute Risk-of-Harm ceiling (normalized).
pub const MAX_ROH: f64 = 0.3;

/// Lineage anchor stamped on every decision.
pub const HEX_STAMP_SPINE: &str = "0xKSR-SPINE-PC-ACCESS-02";

/// Raw K/S/R triple reported on every decision, independent of the request.
pub const DECISION_KNOWLEDGE: u8 = 0xE2;
pub const DECISION_SOCIAL: u8 = 0x78;
pub const DECISION_RISK: u8 = 0x29;

/// Compiled policy constants.
/// Construct once at startup, then share by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyLimits {
    pub risk_ceiling: f64,
    pub defaults: KsrDefaults,
    pub hex_stamp: String,
    pub decision_ksrs: Ksrs,
}

impl Default for PolicyLimits {
    fn default() -> Self {
        Self {
            risk_ceiling: MAX_ROH,
            defaults: KsrDefaults::default(),
            hex_stamp: HEX_STAMP_SPINE.into(),
            decision_ksrs: Ksrs::from_raw(
                RawScore::from(DECISION_KNOWLEDGE),
                RawScore::from(DECISION_SOCIAL),
                RawScore::from(DECISION_RISK),
            ),
        }
    }
}

impl PolicyLimits {
    pub fn from_config(policy: &PolicySection) -> Self {
        Self {
            risk_ceiling: policy.risk_ceiling,
            defaults: KsrDefaults {
                knowledge: RawScore::from(policy.default_knowledge),
                social: RawScore::from(policy.default_social),
                risk: RawScore::from(policy.default_risk),
            },
            hex_stamp: policy.hex_stamp.clone(),
            decision_ksrs: Ksrs::from_raw(
                RawScore::from(policy.decision_knowledge),
                RawScore::from(policy.decision_social),
                RawScore::from(policy.decision_risk),
            ),
        }
    }

    /// Normalized risk of a band set; absent risk takes the default.
    pub fn normalized_risk(&self, bands: Option<&KsrBands>) -> NormalizedScore {
        self.defaults.risk_of(bands).normalize()
    }

    /// Strictly above the ceiling; equal to it is within policy.
    pub fn exceeds_ceiling(&self, risk: NormalizedScore) -> bool {
        risk.value() > self.risk_ceiling
    }
}
