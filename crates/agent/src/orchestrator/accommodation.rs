//! Accommodation dialogue: every field in order, optional ones included

use std::sync::Arc;

use travel_chat_config::EngineConfig;
use travel_chat_core::{Clock, CompletionOutcome, ContextStore, RecordKind, ResponseEnvelope};

use super::{DomainOrchestrator, Orchestrator};
use crate::dialogue::{DialogueEngine, EngineOptions, Opening};
use crate::AgentError;

pub struct AccommodationOrchestrator {
    inner: DomainOrchestrator,
}

impl AccommodationOrchestrator {
    pub fn new(store: Arc<dyn ContextStore>, config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let engine = DialogueEngine::new(
            RecordKind::Accommodation,
            Opening::PromptFirstField,
            EngineOptions::from(config),
            clock,
        );
        Self {
            inner: DomainOrchestrator::new(engine, store),
        }
    }
}

impl Orchestrator for AccommodationOrchestrator {
    fn kind(&self) -> RecordKind {
        RecordKind::Accommodation
    }

    fn orchestrate(
        &self,
        message: &str,
        subject_id: &str,
        requester_id: &str,
    ) -> Result<ResponseEnvelope, AgentError> {
        self.inner.orchestrate(message, subject_id, requester_id)
    }

    fn complete(
        &self,
        subject_id: &str,
        requester_id: &str,
        outcome: &CompletionOutcome,
    ) -> Result<ResponseEnvelope, AgentError> {
        self.inner.complete(subject_id, requester_id, outcome)
    }

    fn has_active(&self, subject_id: &str, requester_id: &str) -> Result<bool, AgentError> {
        self.inner.has_active(subject_id, requester_id)
    }
}
