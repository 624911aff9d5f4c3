//! Service layer field value payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload stored for a field value.
///
/// This is serialized to/from JSONB in the database. The engine never interprets the payload
/// beyond comparing it for equality when a field is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FieldValueContent {
    /// Serializes as: {"type": "Boolean", "value": true}
    Boolean(bool),
    /// Serializes as: {"type": "Number", "value": 42.5}
    Number(f64),
    /// Serializes as: {"type": "String", "value": "text"}
    String(String),
    /// Serializes as: {"type": "Date", "value": "2025-01-01T00:00:00Z"}
    Date(DateTime<Utc>),
    /// Arbitrary structured payload
    /// Serializes as: {"type": "Structured", "value": {...}}
    Structured(serde_json::Value),
}

impl FieldValueContent {
    /// Validate the payload
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            FieldValueContent::Number(n) if !n.is_finite() => Err("Numeric value must be finite"),
            FieldValueContent::String(s) if s.contains('\0') => {
                Err("String value must not contain NUL characters")
            }
            FieldValueContent::Structured(value) if contains_nul(value) => {
                Err("Structured value must not contain NUL characters")
            }
            _ => Ok(()),
        }
    }

    /// Encode the payload for the JSONB `value` column
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Decode the payload from the JSONB `value` column
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// JSONB cannot store `\u0000`, in keys or in strings at any depth
fn contains_nul(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::String(s) => s.contains('\0'),
        serde_json::Value::Array(items) => items.iter().any(contains_nul),
        serde_json::Value::Object(map) => map
            .iter()
            .any(|(key, value)| key.contains('\0') || contains_nul(value)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_content_validation() {
        assert!(FieldValueContent::Boolean(true).validate().is_ok());
        assert!(FieldValueContent::Number(42.0).validate().is_ok());
        assert!(FieldValueContent::String(String::new()).validate().is_ok());
        assert!(
            FieldValueContent::Structured(json!({"a": [1, 2]}))
                .validate()
                .is_ok()
        );

        assert!(FieldValueContent::Number(f64::NAN).validate().is_err());
        assert!(FieldValueContent::Number(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_field_value_content_rejects_nul() {
        assert!(FieldValueContent::String("a\0b".to_string()).validate().is_err());
        assert!(
            FieldValueContent::Structured(json!({"tags": ["ok", {"deep": "x\u{0}y"}]}))
                .validate()
                .is_err()
        );
        assert!(
            FieldValueContent::Structured(json!({"bad\u{0}key": 1}))
                .validate()
                .is_err()
        );

        assert!(
            FieldValueContent::Structured(json!({"tags": ["ok", {"deep": "xy"}]}))
                .validate()
                .is_ok()
        );
    }

    #[test]
    fn test_field_value_content_wire_shape() {
        let value = FieldValueContent::String("alice@example.com".to_string());
        assert_eq!(
            value.to_json().unwrap(),
            json!({"type": "String", "value": "alice@example.com"})
        );

        let decoded =
            FieldValueContent::from_json(json!({"type": "Structured", "value": {"tier": "gold"}}))
                .unwrap();
        assert_eq!(
            decoded,
            FieldValueContent::Structured(json!({"tier": "gold"}))
        );
    }

    #[test]
    fn test_field_value_content_rejects_unknown_tag() {
        let err = FieldValueContent::from_json(json!({"type": "Money", "value": 10}));
        assert!(err.is_err());
    }
}
