//! Inbound message decoding
//!
//! The UI layer sends plain user text or one of a few reserved per-domain
//! sentinel strings. They are decoded once, at the orchestrator boundary.

use serde::{Deserialize, Serialize};

use crate::record::RecordKind;

/// Programmatic action signalled by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlToken {
    ConfirmSave,
    Cancel,
    ContinuePartial,
}

impl ControlToken {
    pub fn all() -> [ControlToken; 3] {
        [
            ControlToken::ConfirmSave,
            ControlToken::Cancel,
            ControlToken::ContinuePartial,
        ]
    }

    fn suffix(&self) -> &'static str {
        match self {
            ControlToken::ConfirmSave => "confirm_save",
            ControlToken::Cancel => "cancel",
            ControlToken::ContinuePartial => "continue_partial",
        }
    }

    /// Wire form for `kind`, e.g. `__accommodation_confirm_save__`
    pub fn wire(&self, kind: RecordKind) -> String {
        format!("__{}_{}__", kind.as_str(), self.suffix())
    }
}

/// One inbound message after decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    FreeText(String),
    Control(ControlToken),
}

impl InputEvent {
    /// Decode `raw` for the `kind` orchestrator
    ///
    /// Only exact sentinels of the same domain are control tokens; anything
    /// else, including another domain's sentinel, is free text.
    pub fn decode(raw: &str, kind: RecordKind) -> Self {
        let trimmed = raw.trim();
        ControlToken::all()
            .into_iter()
            .find(|token| token.wire(kind) == trimmed)
            .map(InputEvent::Control)
            .unwrap_or_else(|| InputEvent::FreeText(raw.to_string()))
    }

    pub fn is_control(&self) -> bool {
        matches!(self, InputEvent::Control(_))
    }
}
