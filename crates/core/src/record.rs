//! Record kinds and collected field values

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The structured record a guided conversation produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Hotel, hostel, apartment, ... booking
    Accommodation,
    /// Flight, train, bus, ... booking
    Transportation,
}

impl RecordKind {
    /// Stable identifier used in store keys and control tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Accommodation => "accommodation",
            RecordKind::Transportation => "transportation",
        }
    }

    /// Italian noun used in user-facing messages
    pub fn display_noun(&self) -> &'static str {
        match self {
            RecordKind::Accommodation => "alloggio",
            RecordKind::Transportation => "trasporto",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An interpreted field value
///
/// Serialized untagged so the persistence layer receives plain JSON scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    /// Optional field the user chose to skip
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            FieldValue::Number(n) => write!(f, "{:.2}", n),
            FieldValue::Bool(true) => f.write_str("sì"),
            FieldValue::Bool(false) => f.write_str("no"),
            FieldValue::Null => f.write_str("-"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

/// Field key -> interpreted value. Keys are absent until populated.
pub type RecordData = HashMap<String, FieldValue>;

/// Returns true when `data` holds a non-null value for `key`
pub fn has_value(data: &RecordData, key: &str) -> bool {
    data.get(key).map(|v| !v.is_null()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_serializes_as_plain_json() {
        let mut data = RecordData::new();
        data.insert("name".into(), FieldValue::text("Hotel Roma"));
        data.insert("cost".into(), FieldValue::Number(320.0));
        data.insert("notes".into(), FieldValue::Null);

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["name"], "Hotel Roma");
        assert_eq!(json["cost"], 320.0);
        assert!(json["notes"].is_null());
    }

    #[test]
    fn test_field_value_roundtrip_keeps_variant() {
        let parsed: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(parsed, FieldValue::Bool(true));

        let parsed: FieldValue = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed.as_str(), Some("EUR"));

        let parsed: FieldValue = serde_json::from_str("null").unwrap();
        assert!(parsed.is_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::Number(150.0).to_string(), "150");
        assert_eq!(FieldValue::Number(12.5).to_string(), "12.50");
        assert_eq!(FieldValue::Null.to_string(), "-");
    }

    #[test]
    fn test_has_value_ignores_null() {
        let mut data = RecordData::new();
        data.insert("currency".into(), FieldValue::Null);
        assert!(!has_value(&data, "currency"));
        data.insert("currency".into(), FieldValue::text("EUR"));
        assert!(has_value(&data, "currency"));
    }
}
