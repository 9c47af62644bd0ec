//! Response envelope returned to the transport / UI layer

use serde::{Deserialize, Serialize};

use crate::record::RecordData;

/// UI directive names understood by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiComponent {
    DateSelector,
    DatetimeSelector,
    TypeSelector,
    CurrencySelector,
    ConfirmationButtons,
    DataSummary,
    PartialDataConfirmation,
    TextInputWithCancel,
}

/// Parameters for a UI directive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiProps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Collected data, for summary views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

/// Commit action requested from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeAction {
    /// Persist `data`, then report back through the completion call
    Save,
    Cancel,
}

/// Orchestrator output for one inbound message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub message: String,
    pub should_continue: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_component: Option<UiComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui_props: Option<UiProps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<EnvelopeAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<RecordData>,
}

impl ResponseEnvelope {
    /// Empty envelope: the message was not for this orchestrator
    pub fn not_handled() -> Self {
        Self::default()
    }

    /// Ongoing dialogue, more input expected
    pub fn prompt(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            should_continue: true,
            ..Default::default()
        }
    }

    /// Dialogue over, no commit
    pub fn finished(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            should_continue: false,
            ..Default::default()
        }
    }

    pub fn save(message: impl Into<String>, data: RecordData) -> Self {
        Self {
            message: message.into(),
            should_continue: false,
            action: Some(EnvelopeAction::Save),
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn cancel(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            should_continue: false,
            action: Some(EnvelopeAction::Cancel),
            ..Default::default()
        }
    }

    pub fn with_ui(mut self, component: UiComponent, props: UiProps) -> Self {
        self.ui_component = Some(component);
        self.ui_props = Some(props);
        self
    }

    pub fn is_handled(&self) -> bool {
        !self.message.is_empty() || self.action.is_some() || self.should_continue
    }
}

/// Result reported by the persistence layer after a save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompletionOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
