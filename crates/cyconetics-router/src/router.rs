//! Decision router.
//!
//! Sequences one request through template resolution, override merge,
//! object validation, the no-exclusion override, and the optional incentive
//! leg. Every path ends in a `Decision`; faults raised along the way are
//! converted to `InternalError` at `decide` and never escape.

use serde_json::Value;

use cyconetics_core::error::{CyconeticsError, Result};
use cyconetics_core::incentive::{IncentiveKind, IncentiveSchema};
use cyconetics_core::object::{ObjectKind, RegulatedObject};
use cyconetics_core::overrides::{apply_overrides, Overridable, UnknownFieldMode};
use cyconetics_core::protocol::{Decision, Request, ValidationResult, Violation};

use crate::policy::{IncentiveValidator, NoExclusionPolicy, ObjectValidator, PolicyLimits};
use crate::templates::TemplateCatalog;

/// Router stages, in the order a request walks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveObjectTemplate,
    MergeOverrides,
    ValidateObject,
    ResolveIncentiveTemplate,
    MergeIncentiveOverrides,
    ValidateIncentive,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::ResolveObjectTemplate => "ResolveObjectTemplate",
            Stage::MergeOverrides => "MergeOverrides",
            Stage::ValidateObject => "ValidateObject",
            Stage::ResolveIncentiveTemplate => "ResolveIncentiveTemplate",
            Stage::MergeIncentiveOverrides => "MergeIncentiveOverrides",
            Stage::ValidateIncentive => "ValidateIncentive",
        }
    }
}

/// Unexpected fault inside the decision path.
#[derive(Debug)]
struct Fault {
    stage: Stage,
    error: CyconeticsError,
}

impl Fault {
    fn at(stage: Stage) -> impl FnOnce(CyconeticsError) -> Fault {
        move |error| Fault { stage, error }
    }
}

pub struct DecisionRouter<'a> {
    limits: &'a PolicyLimits,
    catalog: &'a TemplateCatalog,
    unknown_fields: UnknownFieldMode,
}

impl<'a> DecisionRouter<'a> {
    pub fn new(
        limits: &'a PolicyLimits,
        catalog: &'a TemplateCatalog,
        unknown_fields: UnknownFieldMode,
    ) -> Self {
        Self {
            limits,
            catalog,
            unknown_fields,
        }
    }

    /// Decide one request. Never fails.
    pub fn decide(&self, request: &Request, trace_id: String) -> Decision {
        let span = tracing::info_span!(
            "decide",
            trace_id = %trace_id,
            object_kind = request.object_kind.as_deref().unwrap_or(""),
            zone = %request.envelope.zone,
        );
        let _guard = span.enter();

        let decision = match self.route(request, &trace_id) {
            Ok(d) => d,
            Err(fault) => {
                tracing::error!(stage = fault.stage.as_str(), error = %fault.error, "decision fault");
                Decision {
                    violation: Violation::InternalError,
                    reason: format!("Internal error: {} (at {})", fault.error, fault.stage.as_str()),
                    ..self.base(&trace_id)
                }
            }
        };

        tracing::info!(
            violation = %decision.violation,
            allowed = decision.allowed,
            "decision"
        );
        decision
    }

    fn route(&self, request: &Request, trace_id: &str) -> std::result::Result<Decision, Fault> {
        stage(Stage::ResolveObjectTemplate);
        let tag = request.object_kind.as_deref().unwrap_or("");
        let Some(kind) = ObjectKind::parse(tag) else {
            return Ok(Decision {
                violation: Violation::InvalidCyconeticObject,
                reason: format!("Unknown Cyconetic_Object type: {tag:?}"),
                ..self.base(trace_id)
            });
        };
        let mut object = self
            .catalog
            .object(kind)
            .map_err(Fault::at(Stage::ResolveObjectTemplate))?;

        stage(Stage::MergeOverrides);
        match self.merge(&mut object, request.payload.as_ref()) {
            Ok(()) => {}
            Err(e) if e.is_override_error() => {
                return Ok(Decision {
                    violation: Violation::InvalidCyconeticObject,
                    reason: format!("Cyconetic_Object payload rejected: {e}"),
                    ..self.base(trace_id)
                });
            }
            Err(e) => return Err(Fault::at(Stage::MergeOverrides)(e)),
        }

        stage(Stage::ValidateObject);
        let v_obj = ObjectValidator::new(self.limits).validate(&object);
        if !v_obj.ok {
            let risk = self.limits.normalized_risk(object.ksr_bands());
            if NoExclusionPolicy::new(self.limits).force_allow(request.topic(), risk) {
                tracing::warn!(
                    violation = %v_obj.violation,
                    risk = risk.value(),
                    "no-exclusion invariant forced allow"
                );
                return Ok(Decision {
                    violation: v_obj.violation,
                    allowed: true,
                    reason: "No-exclusion invariant forced allow; object has validator issues."
                        .into(),
                    generated_object: Some(object),
                    ..self.base(trace_id)
                });
            }
            return Ok(Decision {
                violation: v_obj.violation,
                reason: format!("Cyconetic_Object failed validation: {}", v_obj.violation),
                ..self.base(trace_id)
            });
        }

        let Some(incentive_tag) = request.incentive_kind() else {
            return Ok(self.validated(trace_id, object, None));
        };

        stage(Stage::ResolveIncentiveTemplate);
        let Some(incentive_kind) = IncentiveKind::parse(incentive_tag) else {
            return Ok(Decision {
                violation: Violation::InvalidPcIncentive,
                reason: format!("Unknown PC incentive type: {incentive_tag:?}"),
                ..self.base(trace_id)
            });
        };
        let mut incentive = self
            .catalog
            .incentive(incentive_kind)
            .map_err(Fault::at(Stage::ResolveIncentiveTemplate))?;

        stage(Stage::MergeIncentiveOverrides);
        let v_inc = match self.merge(&mut incentive, request.incentive_payload.as_ref()) {
            Ok(()) => {
                stage(Stage::ValidateIncentive);
                IncentiveValidator::new(self.limits).validate(&incentive)
            }
            Err(e) if e.is_override_error() => {
                tracing::debug!(error = %e, "incentive payload rejected");
                ValidationResult::fail(Violation::InvalidPcIncentive)
            }
            Err(e) => return Err(Fault::at(Stage::MergeIncentiveOverrides)(e)),
        };
        if !v_inc.ok {
            // Object-level success stands; only the incentive is withheld.
            return Ok(Decision {
                violation: v_inc.violation,
                allowed: true,
                reason: format!("PC incentive failed validation: {}", v_inc.violation),
                generated_object: Some(object),
                ..self.base(trace_id)
            });
        }

        Ok(self.validated(trace_id, object, Some(incentive)))
    }

    /// Apply a request payload onto a fresh template copy. Only a JSON
    /// object is applied; any other payload shape is ignored.
    fn merge<T: Overridable>(&self, target: &mut T, payload: Option<&Value>) -> Result<()> {
        match payload {
            None | Some(Value::Null) => Ok(()),
            Some(Value::Object(map)) => {
                apply_overrides(target, map, self.unknown_fields)?;
                Ok(())
            }
            Some(other) => {
                tracing::debug!(payload = %other, "non-object payload ignored");
                Ok(())
            }
        }
    }

    fn validated(
        &self,
        trace_id: &str,
        object: RegulatedObject,
        incentive: Option<IncentiveSchema>,
    ) -> Decision {
        Decision {
            allowed: true,
            reason: format!(
                "Cyconetic_Object and optional PC incentive validated under RoH ≤ {}.",
                self.limits.risk_ceiling
            ),
            generated_object: Some(object),
            generated_incentive: incentive,
            ..self.base(trace_id)
        }
    }

    /// Denied, empty decision; callers fill in what applies.
    fn base(&self, trace_id: &str) -> Decision {
        Decision {
            trace_id: trace_id.to_string(),
            hex_stamp: self.limits.hex_stamp.clone(),
            violation: Violation::None,
            ksrs: self.limits.decision_ksrs,
            allowed: false,
            reason: String::new(),
            generated_object: None,
            generated_incentive: None,
        }
    }
}

fn stage(stage: Stage) {
    tracing::debug!(stage = stage.as_str(), "stage");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use cyconetics_core::protocol::TopicType;
    use serde_json::json;

    fn decide_with(catalog: &TemplateCatalog, request: &Request) -> Decision {
        let limits = PolicyLimits::default();
        DecisionRouter::new(&limits, catalog, UnknownFieldMode::Ignore)
            .decide(request, "trace-test".into())
    }

    fn decide(request: &Request) -> Decision {
        decide_with(&TemplateCatalog::builtin(&PolicyLimits::default()), request)
    }

    #[test]
    fn missing_template_becomes_internal_error() {
        let catalog = TemplateCatalog::new(Vec::<RegulatedObject>::new(), Vec::<IncentiveSchema>::new());
        let d = decide_with(&catalog, &Request::new("ZonePolicy"));
        assert_eq!(d.violation, Violation::InternalError);
        assert!(!d.allowed);
        assert!(d.reason.contains("ResolveObjectTemplate"));
        assert!(d.generated_object.is_none());
    }

    #[test]
    fn missing_incentive_template_becomes_internal_error() {
        let limits = PolicyLimits::default();
        let builtin = TemplateCatalog::builtin(&limits);
        let catalog = TemplateCatalog::new(
            vec![builtin.object(ObjectKind::ZonePolicy).unwrap()],
            Vec::new(),
        );
        let mut req = Request::new("ZonePolicy");
        req.incentive_kind = Some("EcoImpactMultiplier".into());
        let d = decide_with(&catalog, &req);
        assert_eq!(d.violation, Violation::InternalError);
        assert!(d.reason.contains("ResolveIncentiveTemplate"));
        assert!(d.generated_object.is_none());
        assert!(d.generated_incentive.is_none());
    }

    #[test]
    fn malformed_object_payload_is_invalid_object() {
        let mut req = Request::new("DeviceCapabilityManifest");
        req.payload = Some(json!({"sessionLimits": "forever"}));
        let d = decide(&req);
        assert_eq!(d.violation, Violation::InvalidCyconeticObject);
        assert!(!d.allowed);
        assert!(d.generated_object.is_none());
    }

    #[test]
    fn kind_change_in_payload_is_invalid_object() {
        let mut req = Request::new("ZonePolicy");
        req.payload = Some(json!({"type": "SiteProfile"}));
        let d = decide(&req);
        assert_eq!(d.violation, Violation::InvalidCyconeticObject);
    }

    #[test]
    fn malformed_incentive_payload_keeps_object() {
        let mut req = Request::new("ZonePolicy");
        req.incentive_kind = Some("LearningProgressIncentive".into());
        req.incentive_payload = Some(json!({"milestones": 3}));
        let d = decide(&req);
        assert!(d.allowed);
        assert_eq!(d.violation, Violation::InvalidPcIncentive);
        assert!(d.generated_object.is_some());
        assert!(d.generated_incentive.is_none());
    }

    #[test]
    fn non_object_payload_is_ignored() {
        let mut req = Request::new("SafetyEpoch");
        req.payload = Some(json!(["not", "a", "record"]));
        let d = decide(&req);
        assert!(d.allowed);
        assert_eq!(d.violation, Violation::None);
    }

    #[test]
    fn ksrs_are_fixed_whatever_the_object() {
        let limits = PolicyLimits::default();
        let mut req = Request::new("ZonePolicy");
        req.topic_type = Some(TopicType::Other);
        req.payload = Some(json!({"ksrBands": {"risk": 224}}));
        let denied = decide(&req);
        assert_eq!(denied.violation, Violation::RiskTooHigh);
        assert_eq!(denied.ksrs, limits.decision_ksrs);

        assert_eq!(decide(&Request::new("SiteProfile")).ksrs, limits.decision_ksrs);
        assert_eq!(decide(&Request::new("Bogus")).ksrs, limits.decision_ksrs);
    }
}
