//! Incentive schemas that may ride along with a regulated object.
//!
//! Incentives reward safe behaviour; the gating flags assert that an
//! incentive can never be used to deny basic access.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::ksr::{lenient, literal_true, KsrBands};
use crate::object::check_same_kind;
use crate::overrides::{parse_field, Overridable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IncentiveKind {
    SafeActivationCredit,
    EcoImpactMultiplier,
    LearningProgressIncentive,
    NeurorightsComplianceBadge,
}

impl IncentiveKind {
    pub const ALL: [IncentiveKind; 4] = [
        IncentiveKind::SafeActivationCredit,
        IncentiveKind::EcoImpactMultiplier,
        IncentiveKind::LearningProgressIncentive,
        IncentiveKind::NeurorightsComplianceBadge,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IncentiveKind::SafeActivationCredit => "SafeActivationCredit",
            IncentiveKind::EcoImpactMultiplier => "EcoImpactMultiplier",
            IncentiveKind::LearningProgressIncentive => "LearningProgressIncentive",
            IncentiveKind::NeurorightsComplianceBadge => "NeurorightsComplianceBadge",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for IncentiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_version() -> String {
    "v1".into()
}

/// Fields shared by every incentive schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveHeader {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        alias = "ksrbands",
        deserialize_with = "lenient::bands",
        skip_serializing_if = "Option::is_none"
    )]
    pub ksr_bands: Option<KsrBands>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl IncentiveHeader {
    pub fn new(description: impl Into<String>, ksr_bands: Option<KsrBands>) -> Self {
        Self {
            id: String::new(),
            version: default_version(),
            description: description.into(),
            ksr_bands,
            metadata: Map::new(),
        }
    }
}

impl Overridable for IncentiveHeader {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "id" => self.id = parse_field(key, value)?,
            "version" => self.version = parse_field(key, value)?,
            "description" => self.description = parse_field(key, value)?,
            "ksrBands" | "ksrbands" => self.ksr_bands = KsrBands::from_value_lenient(value),
            "metadata" => self.metadata = parse_field(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccrualRules {
    #[serde(rename = "requireDCMCompliance")]
    pub require_dcm_compliance: bool,
    #[serde(rename = "requireZoneCompliance")]
    pub require_zone_compliance: bool,
    #[serde(rename = "requireRoHLe")]
    pub require_roh_le: f64,
}

/// Credit accrued for sessions that stay inside manifest and zone limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeActivationCredit {
    #[serde(flatten)]
    pub header: IncentiveHeader,
    #[serde(default)]
    pub accrual_rules: AccrualRules,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub non_gating: bool,
}

impl Overridable for SafeActivationCredit {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "accrualRules" => self.accrual_rules = parse_field(key, value)?,
            "nonGating" => self.non_gating = literal_true(value),
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EcoFields {
    pub eco_tag_required: bool,
    pub min_eco_score_hex: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoImpactMultiplier {
    #[serde(flatten)]
    pub header: IncentiveHeader,
    #[serde(default)]
    pub eco_fields: EcoFields,
    /// Opaque formula text, not evaluated here.
    #[serde(default)]
    pub multiplier_formula: String,
}

impl Overridable for EcoImpactMultiplier {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "ecoFields" => self.eco_fields = parse_field(key, value)?,
            "multiplierFormula" => self.multiplier_formula = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProgressIncentive {
    #[serde(flatten)]
    pub header: IncentiveHeader,
    #[serde(default)]
    pub milestones: Vec<String>,
    #[serde(default)]
    pub raises_knowledge_score: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub cannot_gate_access: bool,
}

impl Overridable for LearningProgressIncentive {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "milestones" => self.milestones = parse_field(key, value)?,
            "raisesKnowledgeScore" => self.raises_knowledge_score = parse_field(key, value)?,
            "cannotGateAccess" => self.cannot_gate_access = literal_true(value),
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeConditions {
    pub no_inner_state_scoring: bool,
    pub no_closed_loop_control: bool,
    pub roh_ceiling_le: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeurorightsComplianceBadge {
    #[serde(flatten)]
    pub header: IncentiveHeader,
    #[serde(default)]
    pub badge_conditions: BadgeConditions,
    #[serde(default)]
    pub machine_verifiable: bool,
}

impl Overridable for NeurorightsComplianceBadge {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "badgeConditions" => self.badge_conditions = parse_field(key, value)?,
            "machineVerifiable" => self.machine_verifiable = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

/// An incentive schema of one of the four closed kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IncentiveSchema {
    SafeActivationCredit(SafeActivationCredit),
    EcoImpactMultiplier(EcoImpactMultiplier),
    LearningProgressIncentive(LearningProgressIncentive),
    NeurorightsComplianceBadge(NeurorightsComplianceBadge),
}

impl IncentiveSchema {
    pub fn kind(&self) -> IncentiveKind {
        match self {
            IncentiveSchema::SafeActivationCredit(_) => IncentiveKind::SafeActivationCredit,
            IncentiveSchema::EcoImpactMultiplier(_) => IncentiveKind::EcoImpactMultiplier,
            IncentiveSchema::LearningProgressIncentive(_) => IncentiveKind::LearningProgressIncentive,
            IncentiveSchema::NeurorightsComplianceBadge(_) => IncentiveKind::NeurorightsComplianceBadge,
        }
    }

    pub fn header(&self) -> &IncentiveHeader {
        match self {
            IncentiveSchema::SafeActivationCredit(i) => &i.header,
            IncentiveSchema::EcoImpactMultiplier(i) => &i.header,
            IncentiveSchema::LearningProgressIncentive(i) => &i.header,
            IncentiveSchema::NeurorightsComplianceBadge(i) => &i.header,
        }
    }

    pub fn ksr_bands(&self) -> Option<&KsrBands> {
        self.header().ksr_bands.as_ref()
    }
}

impl Overridable for IncentiveSchema {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        if key == "type" {
            return check_same_kind(self.kind().as_str(), value);
        }
        match self {
            IncentiveSchema::SafeActivationCredit(i) => i.apply_field(key, value),
            IncentiveSchema::EcoImpactMultiplier(i) => i.apply_field(key, value),
            IncentiveSchema::LearningProgressIncentive(i) => i.apply_field(key, value),
            IncentiveSchema::NeurorightsComplianceBadge(i) => i.apply_field(key, value),
        }
    }
}
