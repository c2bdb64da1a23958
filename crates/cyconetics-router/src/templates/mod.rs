//! Template catalog: one immutable baseline per object and incentive kind.
//!
//! Resolution always hands out a fresh copy, so overrides applied to a
//! request's working object can never reach the shared baseline.

mod builtin;

use std::collections::BTreeMap;

use cyconetics_core::error::{CyconeticsError, Result};
use cyconetics_core::incentive::{IncentiveKind, IncentiveSchema};
use cyconetics_core::object::{ObjectKind, RegulatedObject};

use crate::policy::PolicyLimits;

#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    objects: BTreeMap<ObjectKind, RegulatedObject>,
    incentives: BTreeMap<IncentiveKind, IncentiveSchema>,
}

impl TemplateCatalog {
    /// Catalog from explicit templates. Later entries of the same kind win.
    pub fn new(
        objects: impl IntoIterator<Item = RegulatedObject>,
        incentives: impl IntoIterator<Item = IncentiveSchema>,
    ) -> Self {
        Self {
            objects: objects.into_iter().map(|o| (o.kind(), o)).collect(),
            incentives: incentives.into_iter().map(|i| (i.kind(), i)).collect(),
        }
    }

    /// The builtin skeletons for every kind.
    pub fn builtin(limits: &PolicyLimits) -> Self {
        Self::new(builtin::objects(limits), builtin::incentives(limits))
    }

    /// Fresh copy of the object template for `kind`.
    pub fn object(&self, kind: ObjectKind) -> Result<RegulatedObject> {
        self.objects
            .get(&kind)
            .cloned()
            .ok_or_else(|| CyconeticsError::Internal(format!("no template registered for {kind}")))
    }

    /// Fresh copy of the incentive template for `kind`.
    pub fn incentive(&self, kind: IncentiveKind) -> Result<IncentiveSchema> {
        self.incentives
            .get(&kind)
            .cloned()
            .ok_or_else(|| CyconeticsError::Internal(format!("no template registered for {kind}")))
    }

    pub fn missing_object_kinds(&self) -> Vec<ObjectKind> {
        ObjectKind::ALL
            .into_iter()
            .filter(|k| !self.objects.contains_key(k))
            .collect()
    }

    pub fn missing_incentive_kinds(&self) -> Vec<IncentiveKind> {
        IncentiveKind::ALL
            .into_iter()
            .filter(|k| !self.incentives.contains_key(k))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use cyconetics_core::ksr::RawScore;
    use cyconetics_core::overrides::{apply_overrides, UnknownFieldMode};
    use serde_json::json;

    #[test]
    fn builtin_covers_every_kind() {
        let catalog = TemplateCatalog::builtin(&PolicyLimits::default());
        assert!(catalog.missing_object_kinds().is_empty());
        assert!(catalog.missing_incentive_kinds().is_empty());
        for kind in ObjectKind::ALL {
            assert_eq!(catalog.object(kind).unwrap().kind(), kind);
        }
        for kind in IncentiveKind::ALL {
            assert_eq!(catalog.incentive(kind).unwrap().kind(), kind);
        }
    }

    #[test]
    fn manifest_template_matches_reference_values() {
        let catalog = TemplateCatalog::builtin(&PolicyLimits::default());
        let obj = catalog.object(ObjectKind::DeviceCapabilityManifest).unwrap();
        assert_eq!(obj.ksr_bands().unwrap().risk, Some(RawScore(40)));
        assert_eq!(obj.jurisdiction(), Some("Phoenix-XR-Grid"));
        let RegulatedObject::DeviceCapabilityManifest(m) = obj else {
            panic!("wrong variant");
        };
        let n = m.neurorights.unwrap();
        assert!(n.no_closed_loop_control);
        assert_eq!(n.roh_ceiling, Some(0.3));
    }

    #[test]
    fn site_profile_template_has_no_bands() {
        let catalog = TemplateCatalog::builtin(&PolicyLimits::default());
        let obj = catalog.object(ObjectKind::SiteProfile).unwrap();
        assert!(obj.ksr_bands().is_none());
    }

    #[test]
    fn ceiling_flows_into_templates() {
        let limits = PolicyLimits {
            risk_ceiling: 0.25,
            ..PolicyLimits::default()
        };
        let catalog = TemplateCatalog::builtin(&limits);
        let RegulatedObject::ZonePolicy(z) = catalog.object(ObjectKind::ZonePolicy).unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(z.roh_corridor.max, 0.25);
    }

    #[test]
    fn resolved_copies_do_not_touch_the_baseline() {
        let catalog = TemplateCatalog::builtin(&PolicyLimits::default());
        let mut copy = catalog.object(ObjectKind::HciExportProfile).unwrap();
        let payload = json!({"noClosedLoopUse": false, "id": "hci-1"});
        apply_overrides(&mut copy, payload.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();

        let again = catalog.object(ObjectKind::HciExportProfile).unwrap();
        assert_ne!(copy, again);
        assert_eq!(again.header().id, "");
    }

    #[test]
    fn missing_kind_is_an_internal_error() {
        let catalog = TemplateCatalog::new(Vec::new(), Vec::new());
        let err = catalog.object(ObjectKind::SafetyEpoch).unwrap_err();
        assert_eq!(err.client_code().as_str(), "INTERNAL");
        assert_eq!(catalog.missing_object_kinds().len(), 6);
        assert!(catalog.incentive(IncentiveKind::EcoImpactMultiplier).is_err());
    }
}
