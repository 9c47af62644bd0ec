//! Semantic field kinds and interpreter results

use serde::{Deserialize, Serialize};

use crate::record::{FieldValue, RecordData};

/// Semantic type of a field, selects the interpreter used for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Date,
    DateTime,
    AccommodationType,
    TransportationType,
    Currency,
    Cost,
    Confirmation,
    Contact,
    Location,
    Time,
    Text,
}

impl FieldKind {
    /// Hint appended to a re-prompt after an unparseable answer
    pub fn error_hint(&self) -> &'static str {
        match self {
            FieldKind::Date => {
                "Usa un formato come 2025-04-25, 25/04/2025, \"25 aprile\" o \"domani\"."
            },
            FieldKind::DateTime => "Indica data e ora, ad esempio \"25 aprile alle 14:30\".",
            FieldKind::AccommodationType => {
                "Scegli tra hotel, ostello, appartamento, B&B, resort, campeggio, villa o altro."
            },
            FieldKind::TransportationType => {
                "Scegli tra volo, treno, autobus, auto, traghetto, taxi o altro."
            },
            FieldKind::Currency => "Indica una valuta come EUR, USD, GBP, CHF, JPY o CAD.",
            FieldKind::Cost => "Indica un importo, ad esempio \"150\" o \"150 euro\".",
            FieldKind::Confirmation => "Rispondi sì o no.",
            FieldKind::Contact => "Indica un'email o un numero di telefono.",
            FieldKind::Location => "Indica il nome di un luogo.",
            FieldKind::Time => "Indica un orario, ad esempio 14:30 o \"alle 9\".",
            FieldKind::Text => "Scrivi una risposta.",
        }
    }
}

/// Outcome of interpreting one utterance for one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub success: bool,
    pub value: Option<FieldValue>,
    /// 0.0 - 1.0
    pub confidence: f32,
    /// Human-readable restatement shown to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Values for other fields discovered incidentally
    #[serde(default, skip_serializing_if = "RecordData::is_empty")]
    pub additional_data: RecordData,
}

impl ParseResult {
    pub fn success(value: FieldValue, confidence: f32) -> Self {
        Self {
            success: true,
            value: Some(value),
            confidence: confidence.clamp(0.0, 1.0),
            suggestion: None,
            additional_data: RecordData::new(),
        }
    }

    pub fn failure() -> Self {
        Self {
            success: false,
            value: None,
            confidence: 0.0,
            suggestion: None,
            additional_data: RecordData::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_additional(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.additional_data.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        let result = ParseResult::success(FieldValue::text("x"), 1.7);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_failure_has_no_value() {
        let result = ParseResult::failure();
        assert!(!result.success);
        assert!(result.value.is_none());
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_additional_data() {
        let result = ParseResult::success(FieldValue::Number(320.0), 0.9)
            .with_additional("currency", FieldValue::text("EUR"))
            .with_suggestion("320 EUR");

        assert_eq!(result.additional_data["currency"], FieldValue::text("EUR"));
        assert_eq!(result.suggestion.as_deref(), Some("320 EUR"));
    }
}
