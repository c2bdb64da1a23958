//! Incentive-schema validation.
//!
//! Gating flags are checked before risk: an incentive that could gate
//! access is invalid regardless of how low its risk is.

use serde::Deserialize;
use serde_json::Value;

use cyconetics_core::incentive::IncentiveSchema;
use cyconetics_core::protocol::{ValidationResult, Violation};

use super::PolicyLimits;

pub struct IncentiveValidator<'a> {
    limits: &'a PolicyLimits,
}

impl<'a> IncentiveValidator<'a> {
    pub fn new(limits: &'a PolicyLimits) -> Self {
        Self { limits }
    }

    pub fn validate(&self, incentive: &IncentiveSchema) -> ValidationResult {
        let non_gating = match incentive {
            IncentiveSchema::SafeActivationCredit(c) => c.non_gating,
            IncentiveSchema::LearningProgressIncentive(l) => l.cannot_gate_access,
            IncentiveSchema::EcoImpactMultiplier(_)
            | IncentiveSchema::NeurorightsComplianceBadge(_) => true,
        };
        if !non_gating {
            return ValidationResult::fail(Violation::InvalidPcIncentive);
        }

        let risk = self.limits.normalized_risk(incentive.ksr_bands());
        if self.limits.exceeds_ceiling(risk) {
            return ValidationResult::fail(Violation::RiskTooHigh);
        }

        ValidationResult::pass()
    }

    pub fn validate_json(&self, value: &Value) -> ValidationResult {
        match IncentiveSchema::deserialize(value) {
            Ok(incentive) => self.validate(&incentive),
            Err(e) => {
                tracing::debug!(error = %e, "value is not an incentive schema");
                ValidationResult::fail(Violation::InvalidPcIncentive)
            }
        }
    }
}
