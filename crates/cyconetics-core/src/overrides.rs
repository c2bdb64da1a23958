//! Caller overrides applied onto template copies.
//!
//! Each variant enumerates the keys it accepts. Values replace the
//! template field whole (nested records are not merged into).

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{CyconeticsError, Result};

/// Handling of payload keys a variant does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldMode {
    /// Skip the key and keep going.
    #[default]
    Ignore,
    /// Fail the whole override.
    Reject,
}

/// A record that accepts field-by-field overrides.
pub trait Overridable {
    /// Apply one caller field. `Ok(false)` means the key is not overridable
    /// on this record.
    fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool>;
}

/// Apply every payload entry onto `target`.
///
/// Returns the keys that were ignored. `target` must be a fresh copy: on
/// error it may be partially updated and should be dropped.
pub fn apply_overrides<T: Overridable>(
    target: &mut T,
    payload: &Map<String, Value>,
    mode: UnknownFieldMode,
) -> Result<Vec<String>> {
    let mut ignored = Vec::new();
    for (key, value) in payload {
        if target.apply_field(key, value)? {
            continue;
        }
        match mode {
            UnknownFieldMode::Ignore => {
                tracing::debug!(key = %key, "override key not declared, ignored");
                ignored.push(key.clone());
            }
            UnknownFieldMode::Reject => return Err(CyconeticsError::UnknownField(key.clone())),
        }
    }
    Ok(ignored)
}

/// Typed field value, or `InvalidOverride` naming the key.
pub fn parse_field<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T> {
    T::deserialize(value).map_err(|e| CyconeticsError::InvalidOverride {
        field: key.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Sample {
        id: String,
        count: u32,
    }

    impl Overridable for Sample {
        fn apply_field(&mut self, key: &str, value: &Value) -> Result<bool> {
            match key {
                "id" => self.id = parse_field(key, value)?,
                "count" => self.count = parse_field(key, value)?,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    fn payload(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn ignore_mode_reports_skipped_keys() {
        let mut p = Sample::default();
        let ignored = apply_overrides(
            &mut p,
            &payload(json!({"id": "x", "extra": 1})),
            UnknownFieldMode::Ignore,
        )
        .unwrap();
        assert_eq!(p.id, "x");
        assert_eq!(ignored, vec!["extra".to_string()]);
    }

    #[test]
    fn reject_mode_fails_on_unknown_key() {
        let mut p = Sample::default();
        let err = apply_overrides(&mut p, &payload(json!({"extra": 1})), UnknownFieldMode::Reject)
            .unwrap_err();
        assert!(matches!(err, CyconeticsError::UnknownField(k) if k == "extra"));
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let mut p = Sample::default();
        let err = apply_overrides(&mut p, &payload(json!({"count": "many"})), UnknownFieldMode::Ignore)
            .unwrap_err();
        assert_eq!(err.client_code().as_str(), "INVALID_OVERRIDE");
        assert!(err.to_string().contains("`count`"));
    }
}
