//! Regulated-object validation.
//!
//! Checks run in a fixed order and the first failure is reported:
//! risk ceiling, jurisdiction presence, then the per-kind invariant.

use serde::Deserialize;
use serde_json::Value;

use cyconetics_core::object::RegulatedObject;
use cyconetics_core::protocol::{ValidationResult, Violation};

use super::PolicyLimits;

pub struct ObjectValidator<'a> {
    limits: &'a PolicyLimits,
}

impl<'a> ObjectValidator<'a> {
    pub fn new(limits: &'a PolicyLimits) -> Self {
        Self { limits }
    }

    pub fn validate(&self, obj: &RegulatedObject) -> ValidationResult {
        let risk = self.limits.normalized_risk(obj.ksr_bands());
        if self.limits.exceeds_ceiling(risk) {
            return ValidationResult::fail(Violation::RiskTooHigh);
        }

        // Only presence-with-empty-value; an absent jurisdiction passes.
        if obj.jurisdiction() == Some("") {
            return ValidationResult::fail(Violation::JurisdictionMismatch);
        }

        let closed_loop_excluded = match obj {
            RegulatedObject::HciExportProfile(p) => p.no_closed_loop_use,
            RegulatedObject::DeviceCapabilityManifest(m) => m
                .neurorights
                .as_ref()
                .is_some_and(|n| n.no_closed_loop_control),
            RegulatedObject::ZonePolicy(_)
            | RegulatedObject::SiteProfile(_)
            | RegulatedObject::SignedArtifact(_)
            | RegulatedObject::SafetyEpoch(_) => true,
        };
        if !closed_loop_excluded {
            return ValidationResult::fail(Violation::RiskTooHigh);
        }

        ValidationResult::pass()
    }

    /// Validate untyped JSON. Anything that is not a record of a known kind
    /// fails with `InvalidCyconeticObject`.
    pub fn validate_json(&self, value: &Value) -> ValidationResult {
        match RegulatedObject::deserialize(value) {
            Ok(obj) => self.validate(&obj),
            Err(e) => {
                tracing::debug!(error = %e, "value is not a regulated object");
                ValidationResult::fail(Violation::InvalidCyconeticObject)
            }
        }
    }
}
