//! Builtin skeletons. Values are static reference data; `rohCeiling`-style
//! fields follow the configured risk ceiling.

use serde_json::Map;

use cyconetics_core::incentive::{
    AccrualRules, BadgeConditions, EcoFields, EcoImpactMultiplier, IncentiveHeader,
    IncentiveSchema, LearningProgressIncentive, NeurorightsComplianceBadge, SafeActivationCredit,
};
use cyconetics_core::ksr::KsrBands;
use cyconetics_core::object::{
    ArtifactEcoImpact, ArtifactKind, Authorship, ConsentMode, DeviceCapabilityManifest,
    DeviceEcoImpact, ElectricalLimits, HazardLevel, HciExportProfile, HciPrivacy, Neurorights,
    ObjectHeader, RegulatedObject, RohCorridor, SafetyEpoch, SessionLimits, SignedArtifact,
    SiteProfile, ZonePolicy,
};

use crate::policy::PolicyLimits;

pub(super) fn objects(limits: &PolicyLimits) -> Vec<RegulatedObject> {
    vec![
        device_capability_manifest(limits),
        hci_export_profile(),
        zone_policy(limits),
        site_profile(),
        signed_artifact(limits),
        safety_epoch(),
    ]
}

pub(super) fn incentives(limits: &PolicyLimits) -> Vec<IncentiveSchema> {
    vec![
        safe_activation_credit(limits),
        eco_impact_multiplier(),
        learning_progress(),
        neurorights_badge(limits),
    ]
}

fn device_capability_manifest(limits: &PolicyLimits) -> RegulatedObject {
    let mut header = ObjectHeader::new(Some(KsrBands::new(0xE0, 0x79, 0x28)));
    header.jurisdiction = Some("Phoenix-XR-Grid".into());

    RegulatedObject::DeviceCapabilityManifest(DeviceCapabilityManifest {
        header,
        device_class: "XR-Wearable".into(),
        electrical_limits: ElectricalLimits::default(),
        session_limits: SessionLimits::default(),
        eco_impact: DeviceEcoImpact {
            carbon_tag: "unknown".into(),
            eco_score_hex: 0x80,
            eco_label: "unspecified".into(),
        },
        neurorights: Some(Neurorights {
            no_inner_state_scoring: true,
            no_closed_loop_control: true,
            revocable_at_will: true,
            no_exclusion_basic: true,
            roh_ceiling: Some(limits.risk_ceiling),
        }),
        exports: Vec::new(),
    })
}

fn hci_export_profile() -> RegulatedObject {
    RegulatedObject::HciExportProfile(HciExportProfile {
        header: ObjectHeader::new(Some(KsrBands::new(0xDF, 0x78, 0x2F))),
        allowed_derived_states: Vec::new(),
        sample_rate_hz: 0,
        no_closed_loop_use: true,
        risk_level_hex: 0xDF,
        privacy: HciPrivacy {
            pseudonymous: true,
            retains_raw: false,
        },
    })
}

fn zone_policy(limits: &PolicyLimits) -> RegulatedObject {
    RegulatedObject::ZonePolicy(ZonePolicy {
        header: ObjectHeader::new(Some(KsrBands::new(0xE1, 0x78, 0x2A))),
        zone_id: "XR-ZONE-PHOENIX-01".into(),
        grid: "Phoenix".into(),
        hazard_level: HazardLevel::Low,
        consent_mode: ConsentMode::OptIn,
        allowed_device_classes: Vec::new(),
        allowed_cyconetic_objects: Vec::new(),
        roh_corridor: RohCorridor {
            min: 0.0,
            max: limits.risk_ceiling,
        },
    })
}

fn site_profile() -> RegulatedObject {
    RegulatedObject::SiteProfile(SiteProfile {
        header: ObjectHeader::new(None),
        site_code: "PHX-XR-HUB-01".into(),
        linked_zone_policies: Vec::new(),
        signage_requirements: Vec::new(),
        local_overrides: Map::new(),
    })
}

fn signed_artifact(limits: &PolicyLimits) -> RegulatedObject {
    RegulatedObject::SignedArtifact(SignedArtifact {
        header: ObjectHeader::new(Some(KsrBands::new(0xE1, 0x78, 0x2A))),
        authorship: Authorship::default(),
        artifact_kind: ArtifactKind::Manifest,
        hash_hex: String::new(),
        hex_stamp: limits.hex_stamp.clone(),
        eco_impact: ArtifactEcoImpact {
            carbon_delta: 0.0,
            eco_tag: "unknown".into(),
        },
    })
}

fn safety_epoch() -> RegulatedObject {
    RegulatedObject::SafetyEpoch(SafetyEpoch {
        header: ObjectHeader::new(Some(KsrBands::new(0xE3, 0x7B, 0x27))),
        from_timestamp: String::new(),
        to_timestamp: String::new(),
        violations: Vec::new(),
        notes: String::new(),
    })
}

fn incentive_bands() -> Option<KsrBands> {
    Some(KsrBands::new(0xDE, 0x7A, 0x28))
}

fn safe_activation_credit(limits: &PolicyLimits) -> IncentiveSchema {
    IncentiveSchema::SafeActivationCredit(SafeActivationCredit {
        header: IncentiveHeader::new(
            format!(
                "Safe-activation credit for sessions fully within DCM/XR-Grid/RoH <= {}",
                limits.risk_ceiling
            ),
            incentive_bands(),
        ),
        accrual_rules: AccrualRules {
            require_dcm_compliance: true,
            require_zone_compliance: true,
            require_roh_le: limits.risk_ceiling,
        },
        non_gating: true,
    })
}

fn eco_impact_multiplier() -> IncentiveSchema {
    IncentiveSchema::EcoImpactMultiplier(EcoImpactMultiplier {
        header: IncentiveHeader::new(
            "Multiplier for ECO-tagged research actions in ECO grids.",
            incentive_bands(),
        ),
        eco_fields: EcoFields {
            eco_tag_required: true,
            min_eco_score_hex: 0x90,
        },
        multiplier_formula: "1.0 + eco_score_norm * 0.5".into(),
    })
}

fn learning_progress() -> IncentiveSchema {
    IncentiveSchema::LearningProgressIncentive(LearningProgressIncentive {
        header: IncentiveHeader::new(
            "Milestones for Rust syntax, DCM/HCI manifests, validated PRs.",
            incentive_bands(),
        ),
        milestones: vec![
            "rust_syntax_milestone".into(),
            "dcm_design_milestone".into(),
            "hci_profile_milestone".into(),
            "ci_validated_pr".into(),
        ],
        raises_knowledge_score: true,
        cannot_gate_access: true,
    })
}

fn neurorights_badge(limits: &PolicyLimits) -> IncentiveSchema {
    IncentiveSchema::NeurorightsComplianceBadge(NeurorightsComplianceBadge {
        header: IncentiveHeader::new(
            "Badge when object complies with neurorights.envelope.citizen.*",
            incentive_bands(),
        ),
        badge_conditions: BadgeConditions {
            no_inner_state_scoring: true,
            no_closed_loop_control: true,
            roh_ceiling_le: limits.risk_ceiling,
        },
        machine_verifiable: true,
    })
}
