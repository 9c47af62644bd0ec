//! Domain orchestrators
//!
//! An orchestrator is the entry point for one record kind: it decodes the
//! inbound message, runs the dialogue reducer against the stored context
//! under a per-key lock, and writes the resulting context back.

mod accommodation;
mod transportation;

pub use accommodation::AccommodationOrchestrator;
pub use transportation::TransportationOrchestrator;

use std::sync::Arc;

use travel_chat_core::{
    CompletionOutcome, ContextKey, ContextStore, ConversationContext, InputEvent, RecordKind,
    ResponseEnvelope,
};

use crate::dialogue::DialogueEngine;
use crate::store::KeyedLocks;
use crate::AgentError;

/// Message entry point for one record kind
pub trait Orchestrator: Send + Sync {
    fn kind(&self) -> RecordKind;

    /// Process one inbound message; an empty envelope means "not for me"
    fn orchestrate(
        &self,
        message: &str,
        subject_id: &str,
        requester_id: &str,
    ) -> Result<ResponseEnvelope, AgentError>;

    /// Finish a dialogue after the persistence layer handled a save
    fn complete(
        &self,
        subject_id: &str,
        requester_id: &str,
        outcome: &CompletionOutcome,
    ) -> Result<ResponseEnvelope, AgentError>;

    /// Whether a dialogue is in progress for this subject and requester
    fn has_active(&self, subject_id: &str, requester_id: &str) -> Result<bool, AgentError>;
}

/// Store-backed driver around a [`DialogueEngine`]
pub struct DomainOrchestrator {
    engine: DialogueEngine,
    store: Arc<dyn ContextStore>,
    locks: KeyedLocks,
}

impl DomainOrchestrator {
    pub fn new(engine: DialogueEngine, store: Arc<dyn ContextStore>) -> Self {
        Self {
            engine,
            store,
            locks: KeyedLocks::new(),
        }
    }

    fn key(&self, subject_id: &str, requester_id: &str) -> ContextKey {
        ContextKey::new(self.engine.kind(), subject_id, requester_id)
    }

    /// Write back the reducer's result
    ///
    /// Creation, replacement and deletion are chosen from what existed before
    /// and what the reducer returned. An unchanged context is not rewritten.
    fn persist(
        &self,
        key: &ContextKey,
        before: Option<&ConversationContext>,
        after: Option<ConversationContext>,
    ) -> Result<(), AgentError> {
        match (before, after) {
            (None, None) => {},
            (None, Some(ctx)) => {
                self.store.create(key, ctx)?;
            },
            (Some(_), None) => {
                self.store.delete(key)?;
            },
            (Some(old), Some(new)) if *old == new => {},
            (Some(old), Some(new)) if old.conversation_id != new.conversation_id => {
                self.store.delete(key)?;
                self.store.create(key, new)?;
            },
            (Some(_), Some(new)) => {
                self.store.replace(key, new)?;
            },
        }
        Ok(())
    }
}

impl Orchestrator for DomainOrchestrator {
    fn kind(&self) -> RecordKind {
        self.engine.kind()
    }

    fn orchestrate(
        &self,
        message: &str,
        subject_id: &str,
        requester_id: &str,
    ) -> Result<ResponseEnvelope, AgentError> {
        let key = self.key(subject_id, requester_id);
        let event = InputEvent::decode(message, self.kind());

        self.locks.with_lock(&key, || {
            let before = self.store.get(&key)?;
            let transition = self.engine.reduce(before.clone(), &event)?;

            if let Some(after) = &transition.context {
                tracing::debug!(
                    key = %key,
                    conversation_id = %after.conversation_id,
                    state = %after.state,
                    field = ?after.current_field,
                    "Dialogue turn processed"
                );
            }
            self.persist(&key, before.as_ref(), transition.context)?;
            Ok(transition.envelope)
        })
    }

    fn complete(
        &self,
        subject_id: &str,
        requester_id: &str,
        outcome: &CompletionOutcome,
    ) -> Result<ResponseEnvelope, AgentError> {
        let key = self.key(subject_id, requester_id);

        self.locks.with_lock(&key, || {
            let current = self.store.get(&key)?;
            let transition = self.engine.complete(current.as_ref(), outcome);
            if let Some(ctx) = &current {
                tracing::info!(
                    key = %key,
                    conversation_id = %ctx.conversation_id,
                    success = outcome.success,
                    "Dialogue completed"
                );
            }
            self.persist(&key, current.as_ref(), transition.context)?;
            Ok(transition.envelope)
        })
    }

    fn has_active(&self, subject_id: &str, requester_id: &str) -> Result<bool, AgentError> {
        let key = self.key(subject_id, requester_id);
        Ok(self
            .store
            .get(&key)?
            .is_some_and(|ctx| ctx.state.is_active()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogue::{EngineOptions, Opening};
    use crate::store::InMemoryContextStore;
    use travel_chat_core::{ConversationState, SystemClock};

    fn orchestrator(store: Arc<dyn ContextStore>) -> DomainOrchestrator {
        let engine = DialogueEngine::new(
            RecordKind::Accommodation,
            Opening::PromptFirstField,
            EngineOptions::default(),
            Arc::new(SystemClock),
        );
        DomainOrchestrator::new(engine, store)
    }

    #[test]
    fn test_context_created_then_replaced() {
        let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());
        let orch = orchestrator(Arc::clone(&store));
        let key = ContextKey::new(RecordKind::Accommodation, "trip", "user");

        orch.orchestrate("aggiungi un hotel", "trip", "user").unwrap();
        assert_eq!(store.get(&key).unwrap().unwrap().version, 1);

        orch.orchestrate("Hotel Roma", "trip", "user").unwrap();
        let ctx = store.get(&key).unwrap().unwrap();
        assert_eq!(ctx.version, 2);
        assert_eq!(ctx.current_field.as_deref(), Some("type"));
    }

    #[test]
    fn test_unchanged_context_is_not_rewritten() {
        let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());
        let orch = orchestrator(Arc::clone(&store));
        let key = ContextKey::new(RecordKind::Accommodation, "trip", "user");

        let mut ctx = ConversationContext::new(RecordKind::Accommodation);
        ctx.confirm();
        ctx.begin_saving();
        store.create(&key, ctx).unwrap();

        orch.orchestrate("ci sei?", "trip", "user").unwrap();
        let stored = store.get(&key).unwrap().unwrap();
        assert_eq!(stored.version, 1);
        assert_eq!(stored.state, ConversationState::Saving);
    }

    #[test]
    fn test_stale_idle_context_is_replaced_by_new_dialogue() {
        let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());
        let orch = orchestrator(Arc::clone(&store));
        let key = ContextKey::new(RecordKind::Accommodation, "trip", "user");

        let stale = store
            .create(&key, ConversationContext::new(RecordKind::Accommodation))
            .unwrap();
        orch.orchestrate("aggiungi un hotel", "trip", "user").unwrap();

        let ctx = store.get(&key).unwrap().unwrap();
        assert_ne!(ctx.conversation_id, stale.conversation_id);
        assert_eq!(ctx.state, ConversationState::Collecting);
    }

    #[test]
    fn test_has_active() {
        let store: Arc<dyn ContextStore> = Arc::new(InMemoryContextStore::new());
        let orch = orchestrator(store);
        assert!(!orch.has_active("trip", "user").unwrap());
        orch.orchestrate("nuovo alloggio", "trip", "user").unwrap();
        assert!(orch.has_active("trip", "user").unwrap());
        assert!(!orch.has_active("trip", "someone-else").unwrap());
    }
}
