//! Regulated objects: the six closed kinds a request may create or refine.
//!
//! JSON shape: `{"type": "<Kind>", "id": ..., "version": ..., "ksrBands": {...}, ...}`
//! with camelCase keys. The lower-case keys used by older tooling
//! (`ksrbands`, `noclosedloopuse`) are accepted as aliases.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{CyconeticsError, Result};
use crate::ksr::{lenient, literal_true, KsrBands};
use crate::overrides::{parse_field, Overridable};

/// Discriminant of a regulated object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    DeviceCapabilityManifest,
    HciExportProfile,
    ZonePolicy,
    SiteProfile,
    SignedArtifact,
    SafetyEpoch,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::DeviceCapabilityManifest,
        ObjectKind::HciExportProfile,
        ObjectKind::ZonePolicy,
        ObjectKind::SiteProfile,
        ObjectKind::SignedArtifact,
        ObjectKind::SafetyEpoch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::DeviceCapabilityManifest => "DeviceCapabilityManifest",
            ObjectKind::HciExportProfile => "HciExportProfile",
            ObjectKind::ZonePolicy => "ZonePolicy",
            ObjectKind::SiteProfile => "SiteProfile",
            ObjectKind::SignedArtifact => "SignedArtifact",
            ObjectKind::SafetyEpoch => "SafetyEpoch",
        }
    }

    /// Exact tag match; `None` for anything outside the closed set.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == tag)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_version() -> String {
    "v1".into()
}

/// Fields shared by every regulated object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectHeader {
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// A non-string value counts as absent.
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub jurisdiction: Option<String>,
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

impl ObjectHeader {
    pub fn new(ksr_bands: Option<KsrBands>) -> Self {
        Self {
            id: String::new(),
            version: default_version(),
            jurisdiction: None,
            ksr_bands,
            metadata: Map::new(),
        }
    }
}

impl Overridable for ObjectHeader {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "id" => self.id = parse_field(key, value)?,
            "version" => self.version = parse_field(key, value)?,
            "jurisdiction" => self.jurisdiction = value.as_str().map(str::to_string),
            "ksrBands" | "ksrbands" => self.ksr_bands = KsrBands::from_value_lenient(value),
            "metadata" => self.metadata = parse_field(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// DeviceCapabilityManifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElectricalLimits {
    pub max_current_milli_amp: u32,
    pub max_voltage_milli_volt: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionLimits {
    pub max_session_minutes: u32,
    pub max_sessions_per_day: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceEcoImpact {
    /// low, neutral, high, or unknown.
    pub carbon_tag: String,
    pub eco_score_hex: u8,
    pub eco_label: String,
}

/// Citizen neurorights envelope of a device manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neurorights {
    pub no_inner_state_scoring: bool,
    pub no_closed_loop_control: bool,
    pub revocable_at_will: bool,
    pub no_exclusion_basic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roh_ceiling: Option<f64>,
}

impl Neurorights {
    /// Read from arbitrary JSON: non-records are absent, flags hold only for
    /// a literal `true`.
    pub fn from_value_lenient(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        let flag = |k: &str| obj.get(k).is_some_and(literal_true);
        Some(Self {
            no_inner_state_scoring: flag("noInnerStateScoring"),
            no_closed_loop_control: flag("noClosedLoopControl"),
            revocable_at_will: flag("revocableAtWill"),
            no_exclusion_basic: flag("noExclusionBasic"),
            roh_ceiling: obj.get("rohCeiling").and_then(Value::as_f64),
        })
    }
}

fn lenient_neurorights<'de, D>(d: D) -> std::result::Result<Option<Neurorights>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().and_then(Neurorights::from_value_lenient))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilityManifest {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub device_class: String,
    #[serde(default)]
    pub electrical_limits: ElectricalLimits,
    #[serde(default)]
    pub session_limits: SessionLimits,
    #[serde(default)]
    pub eco_impact: DeviceEcoImpact,
    #[serde(
        default,
        deserialize_with = "lenient_neurorights",
        skip_serializing_if = "Option::is_none"
    )]
    pub neurorights: Option<Neurorights>,
    #[serde(default)]
    pub exports: Vec<String>,
}

impl Overridable for DeviceCapabilityManifest {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "deviceClass" => self.device_class = parse_field(key, value)?,
            "electricalLimits" => self.electrical_limits = parse_field(key, value)?,
            "sessionLimits" => self.session_limits = parse_field(key, value)?,
            "ecoImpact" => self.eco_impact = parse_field(key, value)?,
            "neurorights" => self.neurorights = Neurorights::from_value_lenient(value),
            "exports" => self.exports = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// HciExportProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HciPrivacy {
    pub pseudonymous: bool,
    pub retains_raw: bool,
}

/// Derived-state export profile; raw neural telemetry never leaves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HciExportProfile {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub allowed_derived_states: Vec<String>,
    /// Max allowed export rate.
    #[serde(default)]
    pub sample_rate_hz: u32,
    #[serde(default, alias = "noclosedloopuse", deserialize_with = "lenient::flag")]
    pub no_closed_loop_use: bool,
    #[serde(default)]
    pub risk_level_hex: u8,
    #[serde(default)]
    pub privacy: HciPrivacy,
}

impl Overridable for HciExportProfile {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "allowedDerivedStates" => self.allowed_derived_states = parse_field(key, value)?,
            "sampleRateHz" => self.sample_rate_hz = parse_field(key, value)?,
            "noClosedLoopUse" | "noclosedloopuse" => self.no_closed_loop_use = literal_true(value),
            "riskLevelHex" => self.risk_level_hex = parse_field(key, value)?,
            "privacy" => self.privacy = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// ZonePolicy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsentMode {
    #[default]
    OptIn,
    LayeredConsent,
    ResearchOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RohCorridor {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZonePolicy {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub grid: String,
    #[serde(default)]
    pub hazard_level: HazardLevel,
    #[serde(default)]
    pub consent_mode: ConsentMode,
    #[serde(default)]
    pub allowed_device_classes: Vec<String>,
    #[serde(default)]
    pub allowed_cyconetic_objects: Vec<String>,
    #[serde(default)]
    pub roh_corridor: RohCorridor,
}

impl Overridable for ZonePolicy {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "zoneId" => self.zone_id = parse_field(key, value)?,
            "grid" => self.grid = parse_field(key, value)?,
            "hazardLevel" => self.hazard_level = parse_field(key, value)?,
            "consentMode" => self.consent_mode = parse_field(key, value)?,
            "allowedDeviceClasses" => self.allowed_device_classes = parse_field(key, value)?,
            "allowedCyconeticObjects" => self.allowed_cyconetic_objects = parse_field(key, value)?,
            "rohCorridor" => self.roh_corridor = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// SiteProfile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteProfile {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub site_code: String,
    #[serde(default)]
    pub linked_zone_policies: Vec<String>,
    #[serde(default)]
    pub signage_requirements: Vec<String>,
    #[serde(default)]
    pub local_overrides: Map<String, Value>,
}

impl Overridable for SiteProfile {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "siteCode" => self.site_code = parse_field(key, value)?,
            "linkedZonePolicies" => self.linked_zone_policies = parse_field(key, value)?,
            "signageRequirements" => self.signage_requirements = parse_field(key, value)?,
            "localOverrides" => self.local_overrides = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// SignedArtifact
// ---------------------------------------------------------------------------

/// DID / ALN / Bostrom binding of an artifact. Keys are never carried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authorship {
    pub did: String,
    pub aln: String,
    pub bostrom: String,
    pub eibonlabel: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    #[default]
    Manifest,
    Policy,
    SafetyEpochLog,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactEcoImpact {
    pub carbon_delta: f64,
    pub eco_tag: String,
}

/// Signed artifact envelope. `hash_hex` is opaque and not verified here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedArtifact {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub authorship: Authorship,
    #[serde(default)]
    pub artifact_kind: ArtifactKind,
    #[serde(default)]
    pub hash_hex: String,
    #[serde(default)]
    pub hex_stamp: String,
    #[serde(default)]
    pub eco_impact: ArtifactEcoImpact,
}

impl Overridable for SignedArtifact {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "authorship" => self.authorship = parse_field(key, value)?,
            "artifactKind" => self.artifact_kind = parse_field(key, value)?,
            "hashHex" => self.hash_hex = parse_field(key, value)?,
            "hexStamp" => self.hex_stamp = parse_field(key, value)?,
            "ecoImpact" => self.eco_impact = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// SafetyEpoch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyEpoch {
    #[serde(flatten)]
    pub header: ObjectHeader,
    #[serde(default)]
    pub from_timestamp: String,
    #[serde(default)]
    pub to_timestamp: String,
    #[serde(default)]
    pub violations: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

impl Overridable for SafetyEpoch {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        match key {
            "fromTimestamp" => self.from_timestamp = parse_field(key, value)?,
            "toTimestamp" => self.to_timestamp = parse_field(key, value)?,
            "violations" => self.violations = parse_field(key, value)?,
            "notes" => self.notes = parse_field(key, value)?,
            _ => return self.header.apply_field(key, value),
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// RegulatedObject
// ---------------------------------------------------------------------------

/// A regulated object of one of the six closed kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegulatedObject {
    DeviceCapabilityManifest(DeviceCapabilityManifest),
    HciExportProfile(HciExportProfile),
    ZonePolicy(ZonePolicy),
    SiteProfile(SiteProfile),
    SignedArtifact(SignedArtifact),
    SafetyEpoch(SafetyEpoch),
}

impl RegulatedObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            RegulatedObject::DeviceCapabilityManifest(_) => ObjectKind::DeviceCapabilityManifest,
            RegulatedObject::HciExportProfile(_) => ObjectKind::HciExportProfile,
            RegulatedObject::ZonePolicy(_) => ObjectKind::ZonePolicy,
            RegulatedObject::SiteProfile(_) => ObjectKind::SiteProfile,
            RegulatedObject::SignedArtifact(_) => ObjectKind::SignedArtifact,
            RegulatedObject::SafetyEpoch(_) => ObjectKind::SafetyEpoch,
        }
    }

    pub fn header(&self) -> &ObjectHeader {
        match self {
            RegulatedObject::DeviceCapabilityManifest(o) => &o.header,
            RegulatedObject::HciExportProfile(o) => &o.header,
            RegulatedObject::ZonePolicy(o) => &o.header,
            RegulatedObject::SiteProfile(o) => &o.header,
            RegulatedObject::SignedArtifact(o) => &o.header,
            RegulatedObject::SafetyEpoch(o) => &o.header,
        }
    }

    pub fn ksr_bands(&self) -> Option<&KsrBands> {
        self.header().ksr_bands.as_ref()
    }

    pub fn jurisdiction(&self) -> Option<&str> {
        self.header().jurisdiction.as_deref()
    }
}

impl Overridable for RegulatedObject {
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
        if key == "type" {
            return check_same_kind(self.kind().as_str(), value);
        }
        match self {
            RegulatedObject::DeviceCapabilityManifest(o) => o.apply_field(key, value),
            RegulatedObject::HciExportProfile(o) => o.apply_field(key, value),
            RegulatedObject::ZonePolicy(o) => o.apply_field(key, value),
            RegulatedObject::SiteProfile(o) => o.apply_field(key, value),
            RegulatedObject::SignedArtifact(o) => o.apply_field(key, value),
            RegulatedObject::SafetyEpoch(o) => o.apply_field(key, value),
        }
    }
}

/// A `type` override is accepted only when it restates the current kind.
pub(crate) fn check_same_kind(current: &str, value: &Value) -> Result<bool> {
    match value.as_str() {
        Some(t) if t == current => Ok(true),
        Some(t) => Err(CyconeticsError::KindChange {
            from: current.to_string(),
            to: t.to_string(),
        }),
        None => Err(CyconeticsError::KindChange {
            from: current.to_string(),
            to: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::ksr::RawScore;
    use crate::overrides::{apply_overrides, UnknownFieldMode};
    use serde_json::json;

    fn manifest() -> RegulatedObject {
        RegulatedObject::DeviceCapabilityManifest(DeviceCapabilityManifest {
            header: ObjectHeader::new(Some(KsrBands::new(0xE0, 0x79, 0x28))),
            device_class: "XR-Wearable".into(),
            electrical_limits: ElectricalLimits::default(),
            session_limits: SessionLimits::default(),
            eco_impact: DeviceEcoImpact::default(),
            neurorights: Some(Neurorights {
                no_inner_state_scoring: true,
                no_closed_loop_control: true,
                revocable_at_will: true,
                no_exclusion_basic: true,
                roh_ceiling: Some(0.3),
            }),
            exports: vec![],
        })
    }

    #[test]
    fn kind_parse_is_exact() {
        assert_eq!(ObjectKind::parse("ZonePolicy"), Some(ObjectKind::ZonePolicy));
        assert_eq!(ObjectKind::parse("zonepolicy"), None);
        assert_eq!(ObjectKind::parse("Bogus"), None);
        for k in ObjectKind::ALL {
            assert_eq!(ObjectKind::parse(k.as_str()), Some(k));
        }
    }

    #[test]
    fn serializes_with_type_tag_and_camel_case() {
        let v = serde_json::to_value(manifest()).unwrap();
        assert_eq!(v["type"], "DeviceCapabilityManifest");
        assert_eq!(v["ksrBands"]["risk"], 0x28);
        assert_eq!(v["neurorights"]["noClosedLoopControl"], true);
        assert_eq!(v["deviceClass"], "XR-Wearable");
    }

    #[test]
    fn legacy_lowercase_keys_are_accepted() {
        let obj: RegulatedObject = serde_json::from_value(json!({
            "type": "HciExportProfile",
            "ksrbands": {"knowledge": 223, "social": 120, "risk": 47},
            "noclosedloopuse": true
        }))
        .unwrap();
        let RegulatedObject::HciExportProfile(p) = &obj else {
            panic!("wrong variant");
        };
        assert!(p.no_closed_loop_use);
        assert_eq!(obj.ksr_bands().unwrap().risk, Some(RawScore(47)));
    }

    #[test]
    fn unknown_type_tag_does_not_deserialize() {
        let res = serde_json::from_value::<RegulatedObject>(json!({"type": "Bogus"}));
        assert!(res.is_err());
    }

    #[test]
    fn nested_override_replaces_the_whole_record() {
        let mut obj = manifest();
        let payload = json!({"neurorights": {"noClosedLoopControl": true}});
        apply_overrides(&mut obj, payload.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();
        let RegulatedObject::DeviceCapabilityManifest(m) = &obj else {
            panic!("wrong variant");
        };
        let n = m.neurorights.as_ref().unwrap();
        assert!(n.no_closed_loop_control);
        assert!(!n.revocable_at_will);
        assert_eq!(n.roh_ceiling, None);
    }

    #[test]
    fn non_record_neurorights_is_absent() {
        let mut obj = manifest();
        let payload = json!({"neurorights": "yes"});
        apply_overrides(&mut obj, payload.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();
        let RegulatedObject::DeviceCapabilityManifest(m) = &obj else {
            panic!("wrong variant");
        };
        assert!(m.neurorights.is_none());
    }

    #[test]
    fn type_override_must_restate_kind() {
        let mut obj = manifest();
        let same = json!({"type": "DeviceCapabilityManifest"});
        apply_overrides(&mut obj, same.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();

        let other = json!({"type": "HciExportProfile"});
        let err = apply_overrides(&mut obj, other.as_object().unwrap(), UnknownFieldMode::Reject)
            .unwrap_err();
        assert!(matches!(err, CyconeticsError::KindChange { .. }));
    }

    #[test]
    fn fields_of_other_kinds_are_not_overridable() {
        let mut obj = manifest();
        let payload = json!({"allowedDeviceClasses": ["XR-Wearable"]});
        let err = apply_overrides(&mut obj, payload.as_object().unwrap(), UnknownFieldMode::Reject)
            .unwrap_err();
        assert!(matches!(err, CyconeticsError::UnknownField(k) if k == "allowedDeviceClasses"));
    }

    #[test]
    fn non_string_jurisdiction_is_absent() {
        let mut obj = manifest();
        let payload = json!({"jurisdiction": 5});
        apply_overrides(&mut obj, payload.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();
        assert_eq!(obj.jurisdiction(), None);

        let parsed: RegulatedObject =
            serde_json::from_value(json!({"type": "ZonePolicy", "jurisdiction": ["PHX"]})).unwrap();
        assert_eq!(parsed.jurisdiction(), None);

        let payload = json!({"jurisdiction": ""});
        apply_overrides(&mut obj, payload.as_object().unwrap(), UnknownFieldMode::Reject).unwrap();
        assert_eq!(obj.jurisdiction(), Some(""));
    }
}
