//! Conversation state machine and per-session context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::record::{FieldValue, RecordData, RecordKind};

/// Lifecycle state of a guided data-collection dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    /// No dialogue in progress. Idle contexts are not kept in the store.
    #[default]
    Idle,
    /// Waiting for a value for `current_field`
    Collecting,
    /// All needed fields present, waiting for yes/no on the summary
    Confirming,
    /// Save requested, waiting for the persistence layer's outcome
    Saving,
}

impl ConversationState {
    /// Allowed transitions from this state
    pub fn allowed_transitions(&self) -> &'static [ConversationState] {
        use ConversationState::*;
        match self {
            Idle => &[Collecting, Confirming],
            Collecting => &[Collecting, Confirming, Saving, Idle],
            Confirming => &[Collecting, Saving, Idle],
            Saving => &[Idle],
        }
    }

    /// Check if transition to target state is allowed
    pub fn can_transition_to(&self, target: ConversationState) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// True for every state in which cancel keywords are honored
    pub fn is_active(&self) -> bool {
        !matches!(self, ConversationState::Idle)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::Collecting => "collecting",
            ConversationState::Confirming => "confirming",
            ConversationState::Saving => "saving",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store key: one dialogue per record kind, subject (trip) and requester (user)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextKey {
    pub kind: RecordKind,
    pub subject_id: String,
    pub requester_id: String,
}

impl ContextKey {
    pub fn new(
        kind: RecordKind,
        subject_id: impl Into<String>,
        requester_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            subject_id: subject_id.into(),
            requester_id: requester_id.into(),
        }
    }

    /// Flat string form, used as the key in external stores
    pub fn storage_key(&self) -> String {
        format!("{}:{}:{}", self.kind, self.subject_id, self.requester_id)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (subject={}, requester={})",
            self.kind, self.subject_id, self.requester_id
        )
    }
}

/// State of one active dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Correlation id for logs
    pub conversation_id: Uuid,
    pub kind: RecordKind,
    pub state: ConversationState,
    /// Field awaiting a value. Set iff `state == Collecting`.
    pub current_field: Option<String>,
    pub data: RecordData,
    /// Processed field keys in acceptance order
    pub completed_fields: Vec<String>,
    /// Consecutive invalid answers for `current_field`
    pub retry_count: u8,
    pub last_question: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Bumped by the store on every successful write
    pub version: u64,
}

impl ConversationContext {
    /// Fresh context for a just-triggered dialogue
    pub fn new(kind: RecordKind) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: Uuid::new_v4(),
            kind,
            state: ConversationState::Idle,
            current_field: None,
            data: RecordData::new(),
            completed_fields: Vec::new(),
            retry_count: 0,
            last_question: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Move to `Collecting` on `field`, keeping the `current_field` invariant
    pub fn collect(&mut self, field: &str) {
        self.transition(ConversationState::Collecting);
        self.current_field = Some(field.to_string());
    }

    /// Move to `Confirming`
    pub fn confirm(&mut self) {
        self.transition(ConversationState::Confirming);
        self.current_field = None;
    }

    /// Move to `Saving`
    pub fn begin_saving(&mut self) {
        self.transition(ConversationState::Saving);
        self.current_field = None;
    }

    fn transition(&mut self, target: ConversationState) {
        if !self.state.can_transition_to(target) {
            tracing::warn!(
                conversation_id = %self.conversation_id,
                from = %self.state,
                to = %target,
                "Unexpected conversation state transition"
            );
        }
        self.state = target;
    }

    /// Record an accepted value for `field`
    pub fn accept(&mut self, field: &str, value: FieldValue) {
        self.data.insert(field.to_string(), value);
        self.mark_completed(field);
        self.retry_count = 0;
    }

    /// Append `field` to the completed list if not already there
    pub fn mark_completed(&mut self, field: &str) {
        if !self.completed_fields.iter().any(|f| f == field) {
            self.completed_fields.push(field.to_string());
        }
    }

    pub fn is_completed(&self, field: &str) -> bool {
        self.completed_fields.iter().any(|f| f == field)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Time since the last write
    pub fn idle_for(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.updated_at
    }
}

/// Partial update applied by `ContextStore::update`
#[derive(Debug, Clone, Default)]
pub struct ContextPatch {
    pub state: Option<ConversationState>,
    /// `Some(None)` clears the current field
    pub current_field: Option<Option<String>>,
    /// Merged into the existing data
    pub data: Option<RecordData>,
    pub completed_fields: Option<Vec<String>>,
    pub retry_count: Option<u8>,
    pub last_question: Option<String>,
}

impl ContextPatch {
    pub fn apply(self, ctx: &mut ConversationContext) {
        if let Some(state) = self.state {
            ctx.state = state;
        }
        if let Some(field) = self.current_field {
            ctx.current_field = field;
        }
        if let Some(data) = self.data {
            ctx.data.extend(data);
        }
        if let Some(completed) = self.completed_fields {
            ctx.completed_fields = completed;
        }
        if let Some(retry_count) = self.retry_count {
            ctx.retry_count = retry_count;
        }
        if let Some(question) = self.last_question {
            ctx.last_question = Some(question);
        }
        ctx.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use ConversationState::*;
        assert!(Idle.can_transition_to(Collecting));
        assert!(Collecting.can_transition_to(Confirming));
        assert!(Confirming.can_transition_to(Saving));
        assert!(!Saving.can_transition_to(Collecting));
        assert!(!Idle.is_active());
        assert!(Saving.is_active());
    }

    #[test]
    fn test_current_field_invariant() {
        let mut ctx = ConversationContext::new(RecordKind::Accommodation);
        ctx.collect("name");
        assert_eq!(ctx.state, ConversationState::Collecting);
        assert_eq!(ctx.current_field.as_deref(), Some("name"));

        ctx.confirm();
        assert_eq!(ctx.state, ConversationState::Confirming);
        assert!(ctx.current_field.is_none());
    }

    #[test]
    fn test_accept_resets_retries_and_dedups() {
        let mut ctx = ConversationContext::new(RecordKind::Accommodation);
        ctx.retry_count = 2;
        ctx.accept("name", FieldValue::text("Hotel Roma"));
        ctx.accept("name", FieldValue::text("Hotel Milano"));

        assert_eq!(ctx.retry_count, 0);
        assert_eq!(ctx.completed_fields, vec!["name".to_string()]);
        assert_eq!(ctx.data["name"], FieldValue::text("Hotel Milano"));
    }

    #[test]
    fn test_patch_merges_data() {
        let mut ctx = ConversationContext::new(RecordKind::Transportation);
        ctx.data.insert("type".into(), FieldValue::text("train"));

        let mut data = RecordData::new();
        data.insert("cost".into(), FieldValue::Number(45.0));
        ContextPatch {
            data: Some(data),
            current_field: Some(Some("departure_location".into())),
            state: Some(ConversationState::Collecting),
            ..Default::default()
        }
        .apply(&mut ctx);

        assert_eq!(ctx.data.len(), 2);
        assert_eq!(ctx.current_field.as_deref(), Some("departure_location"));
    }

    #[test]
    fn test_storage_key() {
        let key = ContextKey::new(RecordKind::Transportation, "trip-9", "user-3");
        assert_eq!(key.storage_key(), "transportation:trip-9:user-3");
    }
}
