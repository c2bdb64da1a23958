//! K/S/R (knowledge, social, risk) scores.
//!
//! Scores travel as byte-scaled integers (`0x00..=0xFF`) and are interpreted
//! as unit-interval values for policy checks and dashboards.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Highest raw score; normalizes to `1.0`.
pub const RAW_SCORE_MAX: i64 = 0xFF;

/// Fallback knowledge score when a band set omits it.
pub const DEFAULT_KNOWLEDGE: RawScore = RawScore(0xD0);
/// Fallback social score when a band set omits it.
pub const DEFAULT_SOCIAL: RawScore = RawScore(0x70);
/// Fallback risk score when a band set omits it.
pub const DEFAULT_RISK: RawScore = RawScore(0x20);

/// Byte-scaled score before normalization. Out-of-range values are kept as
/// given and clamped when normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawScore(pub i64);

impl RawScore {
    pub fn normalize(self) -> NormalizedScore {
        normalize(self.0)
    }
}

impl From<u8> for RawScore {
    fn from(v: u8) -> Self {
        RawScore(i64::from(v))
    }
}

/// Score in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NormalizedScore(f64);

impl NormalizedScore {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Clamp `raw` to `[0, 255]` and scale to the unit interval.
pub fn normalize(raw: i64) -> NormalizedScore {
    let v = raw.clamp(0, RAW_SCORE_MAX);
    NormalizedScore(v as f64 / RAW_SCORE_MAX as f64)
}

/// Raw K/S/R band set carried by objects and incentives.
///
/// Every member is optional; absent members resolve against `KsrDefaults`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KsrBands {
    #[serde(default, deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<RawScore>,
    #[serde(default, deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub social: Option<RawScore>,
    #[serde(default, deserialize_with = "lenient::score", skip_serializing_if = "Option::is_none")]
    pub risk: Option<RawScore>,
}

impl KsrBands {
    pub fn new(knowledge: u8, social: u8, risk: u8) -> Self {
        Self {
            knowledge: Some(knowledge.into()),
            social: Some(social.into()),
            risk: Some(risk.into()),
        }
    }

    /// Read a band set from arbitrary JSON. Anything other than a record
    /// yields `None`; non-numeric members are treated as absent.
    pub fn from_value_lenient(v: &Value) -> Option<Self> {
        let obj = v.as_object()?;
        Some(Self {
            knowledge: obj.get("knowledge").and_then(score_from_value),
            social: obj.get("social").and_then(score_from_value),
            risk: obj.get("risk").and_then(score_from_value),
        })
    }
}

/// Fallback raw scores used when a band member is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsrDefaults {
    pub knowledge: RawScore,
    pub social: RawScore,
    pub risk: RawScore,
}

impl Default for KsrDefaults {
    fn default() -> Self {
        Self {
            knowledge: DEFAULT_KNOWLEDGE,
            social: DEFAULT_SOCIAL,
            risk: DEFAULT_RISK,
        }
    }
}

impl KsrDefaults {
    /// Raw risk of an optional band set, defaulted.
    pub fn risk_of(&self, bands: Option<&KsrBands>) -> RawScore {
        bands.and_then(|b| b.risk).unwrap_or(self.risk)
    }
}

/// Normalized K/S/R triple reported in a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ksrs {
    pub k: f64,
    pub s: f64,
    pub r: f64,
}

impl Ksrs {
    pub fn from_raw(knowledge: RawScore, social: RawScore, risk: RawScore) -> Self {
        Self {
            k: knowledge.normalize().value(),
            s: social.normalize().value(),
            r: risk.normalize().value(),
        }
    }
}

/// Numeric JSON to raw score; fractional values truncate toward zero.
pub fn score_from_value(v: &Value) -> Option<RawScore> {
    if let Some(i) = v.as_i64() {
        return Some(RawScore(i));
    }
    v.as_f64()
        .filter(|f| f.is_finite())
        .map(|f| RawScore(f.trunc() as i64))
}

/// Guard flags assert their guarantee only with a literal `true`.
pub fn literal_true(v: &Value) -> bool {
    matches!(v, Value::Bool(true))
}

/// Deserializers that never fail on a wrong JSON type.
pub mod lenient {
    use super::*;

    pub fn score<'de, D>(d: D) -> std::result::Result<Option<RawScore>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(score_from_value))
    }

    pub fn flag<'de, D>(d: D) -> std::result::Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().is_some_and(literal_true))
    }

    /// JSON string, or `None` for any other value.
    pub fn text<'de, D>(d: D) -> std::result::Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }))
    }

    pub fn bands<'de, D>(d: D) -> std::result::Result<Option<KsrBands>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.as_ref().and_then(KsrBands::from_value_lenient))
    }
}
