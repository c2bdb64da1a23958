//! Decision record and violation taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::incentive::IncentiveSchema;
use crate::ksr::Ksrs;
use crate::object::RegulatedObject;

/// Closed violation taxonomy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    #[default]
    None,
    RiskTooHigh,
    JurisdictionMismatch,
    /// Reserved; no check produces it.
    MissingManifest,
    InvalidCyconeticObject,
    #[serde(rename = "InvalidPCIncentive")]
    InvalidPcIncentive,
    InternalError,
}

impl Violation {
    pub fn as_str(self) -> &'static str {
        match self {
            Violation::None => "None",
            Violation::RiskTooHigh => "RiskTooHigh",
            Violation::JurisdictionMismatch => "JurisdictionMismatch",
            Violation::MissingManifest => "MissingManifest",
            Violation::InvalidCyconeticObject => "InvalidCyconeticObject",
            Violation::InvalidPcIncentive => "InvalidPCIncentive",
            Violation::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single validator. Validators never return errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub violation: Violation,
}

impl ValidationResult {
    pub const fn pass() -> Self {
        Self {
            ok: true,
            violation: Violation::None,
        }
    }

    pub const fn fail(violation: Violation) -> Self {
        Self {
            ok: false,
            violation,
        }
    }
}

/// Engine answer for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub trace_id: String,
    /// Fixed lineage stamp; never derived from the request.
    pub hex_stamp: String,
    pub violation: Violation,
    pub ksrs: Ksrs,
    pub allowed: bool,
    pub reason: String,
    pub generated_object: Option<RegulatedObject>,
    pub generated_incentive: Option<IncentiveSchema>,
}
