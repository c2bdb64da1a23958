//! Decision request (JSON).
//!
//! Only a request that is not a JSON record fails to parse. Every field is
//! read leniently: kinds are carried as raw strings so an unknown or
//! mistyped kind still reaches the router and produces a decision, and
//! pass-through envelope fields never reject a request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Topic class of a request. Any unrecognised topic is `Other`; an absent
/// or empty topic is `NonStimulationDocs`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopicType {
    /// Manifests, profiles, governance text, eco-metrics.
    #[default]
    NonStimulationDocs,
    #[serde(other)]
    Other,
}

/// Caller intent. Informational only; unrecognised values are `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Design,
    Refine,
    Query,
    #[serde(other)]
    Other,
}

/// Caller identity envelope, passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Envelope {
    #[serde(deserialize_with = "wire::text")]
    pub did: String,
    #[serde(deserialize_with = "wire::text")]
    pub aln: String,
    #[serde(deserialize_with = "wire::text")]
    pub bostrom: String,
    #[serde(deserialize_with = "wire::text")]
    pub zone: String,
    #[serde(deserialize_with = "wire::tag", skip_serializing_if = "Option::is_none")]
    pub traceid: Option<String>,
}

impl Envelope {
    /// Caller-supplied trace id, if non-empty.
    pub fn trace_id(&self) -> Option<&str> {
        self.traceid.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default, deserialize_with = "wire::topic")]
    pub topic_type: Option<TopicType>,
    #[serde(default, deserialize_with = "wire::tag")]
    pub object_kind: Option<String>,
    #[serde(default, deserialize_with = "wire::tag")]
    pub incentive_kind: Option<String>,
    #[serde(default, deserialize_with = "wire::intent", skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(default, deserialize_with = "wire::envelope")]
    pub envelope: Envelope,
    /// Partial object overrides; only a JSON object is applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incentive_payload: Option<Value>,
}

impl Request {
    pub fn new(object_kind: impl Into<String>) -> Self {
        Self {
            object_kind: Some(object_kind.into()),
            ..Self::default()
        }
    }

    pub fn topic(&self) -> TopicType {
        self.topic_type.unwrap_or_default()
    }

    /// Requested incentive kind; an empty string counts as none requested.
    pub fn incentive_kind(&self) -> Option<&str> {
        self.incentive_kind.as_deref().filter(|k| !k.is_empty())
    }
}

/// Field readers that never fail on a wrong JSON type.
mod wire {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{Envelope, Intent, TopicType};

    /// `null`, `false`, `0` and `""` count as not given.
    fn is_blank(v: &Value) -> bool {
        match v {
            Value::Null | Value::Bool(false) => true,
            Value::String(s) => s.is_empty(),
            Value::Number(n) => n.as_f64() == Some(0.0),
            _ => false,
        }
    }

    /// Blank values are absent; strings pass as-is; anything else keeps its
    /// JSON text, which never matches a known kind.
    pub fn tag<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.filter(|v| !is_blank(v)).map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    pub fn text<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
        })
    }

    pub fn topic<'de, D>(d: D) -> Result<Option<TopicType>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.filter(|v| !is_blank(v))
            .map(|v| TopicType::deserialize(&v).unwrap_or(TopicType::Other)))
    }

    pub fn intent<'de, D>(d: D) -> Result<Option<Intent>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(v.filter(|v| !v.is_null())
            .map(|v| Intent::deserialize(&v).unwrap_or(Intent::Other)))
    }

    /// A non-record envelope is empty.
    pub fn envelope<'de, D>(d: D) -> Result<Envelope, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Option::<Value>::deserialize(d)?;
        Ok(match v {
            Some(v @ Value::Object(_)) => Envelope::deserialize(&v).unwrap_or_default(),
            _ => Envelope::default(),
        })
    }
}
