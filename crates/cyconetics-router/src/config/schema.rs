//! Engine config schema. Every section rejects unknown keys; every field but
//! `version` has a default.

use serde::Deserialize;

use cyconetics_core::error::{CyconeticsError, Result};
use cyconetics_core::ksr::{DEFAULT_KNOWLEDGE, DEFAULT_RISK, DEFAULT_SOCIAL};
use cyconetics_core::overrides::UnknownFieldMode;

use crate::policy::{DECISION_KNOWLEDGE, DECISION_RISK, DECISION_SOCIAL, HEX_STAMP_SPINE, MAX_ROH};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub version: u32,

    #[serde(default)]
    pub policy: PolicySection,

    #[serde(default)]
    pub overrides: OverrideSection,

    #[serde(default)]
    pub catalog: CatalogSection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            policy: PolicySection::default(),
            overrides: OverrideSection::default(),
            catalog: CatalogSection::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(CyconeticsError::UnsupportedVersion);
        }

        self.policy.validate()?;

        Ok(())
    }
}

/// Policy constants. Raw defaults are byte-scaled (`0..=255`).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    #[serde(default = "default_risk_ceiling")]
    pub risk_ceiling: f64,

    #[serde(default = "default_knowledge")]
    pub default_knowledge: u8,

    #[serde(default = "default_social")]
    pub default_social: u8,

    #[serde(default = "default_risk")]
    pub default_risk: u8,

    #[serde(default = "default_hex_stamp")]
    pub hex_stamp: String,

    /// Raw K/S/R triple reported on every decision.
    #[serde(default = "default_decision_knowledge")]
    pub decision_knowledge: u8,

    #[serde(default = "default_decision_social")]
    pub decision_social: u8,

    #[serde(default = "default_decision_risk")]
    pub decision_risk: u8,
}

impl Default for PolicySection {
    fn default() -> Self {
        Self {
            risk_ceiling: default_risk_ceiling(),
            default_knowledge: default_knowledge(),
            default_social: default_social(),
            default_risk: default_risk(),
            hex_stamp: default_hex_stamp(),
            decision_knowledge: default_decision_knowledge(),
            decision_social: default_decision_social(),
            decision_risk: default_decision_risk(),
        }
    }
}

impl PolicySection {
    pub fn validate(&self) -> Result<()> {
        if !self.risk_ceiling.is_finite() || !(0.0..=1.0).contains(&self.risk_ceiling) {
            return Err(CyconeticsError::BadRequest(
                "policy.risk_ceiling must be between 0.0 and 1.0".into(),
            ));
        }
        if self.hex_stamp.trim().is_empty() {
            return Err(CyconeticsError::BadRequest(
                "policy.hex_stamp must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_risk_ceiling() -> f64 {
    MAX_ROH
}
fn default_knowledge() -> u8 {
    DEFAULT_KNOWLEDGE.0 as u8
}
fn default_social() -> u8 {
    DEFAULT_SOCIAL.0 as u8
}
fn default_risk() -> u8 {
    DEFAULT_RISK.0 as u8
}
fn default_hex_stamp() -> String {
    HEX_STAMP_SPINE.into()
}
fn default_decision_knowledge() -> u8 {
    DECISION_KNOWLEDGE
}
fn default_decision_social() -> u8 {
    DECISION_SOCIAL
}
fn default_decision_risk() -> u8 {
    DECISION_RISK
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideSection {
    #[serde(default)]
    pub unknown_fields: UnknownFieldMode,
}

/// Startup checks on the template catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    /// Refuse to build an engine whose catalog misses a kind. Otherwise the
    /// gap is logged and requests for that kind end in `InternalError`.
    #[serde(default)]
    pub fail_fast_on_missing: bool,
}
