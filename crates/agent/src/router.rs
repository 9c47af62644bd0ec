//! Routes inbound messages to the right domain orchestrator

use std::sync::Arc;

use travel_chat_config::{EngineConfig, Settings};
use travel_chat_core::{
    Clock, CompletionOutcome, ContextStore, InputEvent, RecordKind, ResponseEnvelope, SystemClock,
};

use crate::orchestrator::{AccommodationOrchestrator, Orchestrator, TransportationOrchestrator};
use crate::store::build_store;
use crate::AgentError;

/// Envelope plus the domain that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedResponse {
    /// `None` when no orchestrator handled the message
    pub kind: Option<RecordKind>,
    pub envelope: ResponseEnvelope,
}

impl RoutedResponse {
    pub fn is_handled(&self) -> bool {
        self.kind.is_some() && self.envelope.is_handled()
    }
}

/// Front door owning both orchestrators over one shared store
pub struct TravelAssistant {
    store: Arc<dyn ContextStore>,
    orchestrators: Vec<Box<dyn Orchestrator>>,
}

impl TravelAssistant {
    pub fn new(store: Arc<dyn ContextStore>, config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let orchestrators: Vec<Box<dyn Orchestrator>> = vec![
            Box::new(AccommodationOrchestrator::new(
                Arc::clone(&store),
                config,
                Arc::clone(&clock),
            )),
            Box::new(TransportationOrchestrator::new(
                Arc::clone(&store),
                config,
                clock,
            )),
        ];
        Self {
            store,
            orchestrators,
        }
    }

    /// Build the store backend from settings and wire both domains to it
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let store = build_store(&settings.store)?;
        Ok(Self::new(store, &settings.engine, Arc::new(SystemClock)))
    }

    pub fn store(&self) -> &Arc<dyn ContextStore> {
        &self.store
    }

    fn orchestrator(&self, kind: RecordKind) -> Result<&dyn Orchestrator, AgentError> {
        self.orchestrators
            .iter()
            .find(|o| o.kind() == kind)
            .map(|o| o.as_ref())
            .ok_or_else(|| AgentError::Initialization(format!("no orchestrator for {}", kind)))
    }

    /// Dispatch one message
    ///
    /// A control token goes to the domain it names. Otherwise a domain with a
    /// dialogue in progress gets the message, accommodation first. Otherwise
    /// each domain is offered the message in turn.
    pub fn handle(
        &self,
        message: &str,
        subject_id: &str,
        requester_id: &str,
    ) -> Result<RoutedResponse, AgentError> {
        let routed = |orchestrator: &dyn Orchestrator| -> Result<RoutedResponse, AgentError> {
            Ok(RoutedResponse {
                kind: Some(orchestrator.kind()),
                envelope: orchestrator.orchestrate(message, subject_id, requester_id)?,
            })
        };

        if let Some(orchestrator) = self
            .orchestrators
            .iter()
            .find(|o| InputEvent::decode(message, o.kind()).is_control())
        {
            return routed(orchestrator.as_ref());
        }

        for orchestrator in &self.orchestrators {
            if orchestrator.has_active(subject_id, requester_id)? {
                return routed(orchestrator.as_ref());
            }
        }

        for orchestrator in &self.orchestrators {
            let envelope = orchestrator.orchestrate(message, subject_id, requester_id)?;
            if envelope.is_handled() {
                return Ok(RoutedResponse {
                    kind: Some(orchestrator.kind()),
                    envelope,
                });
            }
        }

        tracing::debug!(subject_id, requester_id, "Message not handled by any domain");
        Ok(RoutedResponse {
            kind: None,
            envelope: ResponseEnvelope::not_handled(),
        })
    }

    /// Forward the persistence outcome to the domain that requested the save
    pub fn complete(
        &self,
        kind: RecordKind,
        subject_id: &str,
        requester_id: &str,
        outcome: &CompletionOutcome,
    ) -> Result<ResponseEnvelope, AgentError> {
        self.orchestrator(kind)?
            .complete(subject_id, requester_id, outcome)
    }

    pub fn has_active(
        &self,
        kind: RecordKind,
        subject_id: &str,
        requester_id: &str,
    ) -> Result<bool, AgentError> {
        self.orchestrator(kind)?.has_active(subject_id, requester_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryContextStore;
    use travel_chat_core::EnvelopeAction;

    fn assistant() -> TravelAssistant {
        TravelAssistant::new(
            Arc::new(InMemoryContextStore::new()),
            &EngineConfig::default(),
            Arc::new(SystemClock),
        )
    }

    #[test]
    fn test_trigger_selects_domain() {
        let assistant = assistant();
        let hotel = assistant.handle("aggiungi un hotel", "trip", "anna").unwrap();
        assert_eq!(hotel.kind, Some(RecordKind::Accommodation));

        let train = assistant.handle("nuovo treno", "trip", "marco").unwrap();
        assert_eq!(train.kind, Some(RecordKind::Transportation));
    }

    #[test]
    fn test_active_dialogue_takes_answers() {
        let assistant = assistant();
        assistant.handle("aggiungi un hotel", "trip", "anna").unwrap();
        // Would trigger transportation if no dialogue were active
        let routed = assistant
            .handle("Hotel vicino al treno nuovo", "trip", "anna")
            .unwrap();
        assert_eq!(routed.kind, Some(RecordKind::Accommodation));
        assert!(!assistant
            .has_active(RecordKind::Transportation, "trip", "anna")
            .unwrap());
    }

    #[test]
    fn test_control_token_goes_to_named_domain() {
        let assistant = assistant();
        assistant.handle("aggiungi un hotel", "trip", "anna").unwrap();
        let routed = assistant
            .handle("__accommodation_cancel__", "trip", "anna")
            .unwrap();
        assert_eq!(routed.kind, Some(RecordKind::Accommodation));
        assert_eq!(routed.envelope.action, Some(EnvelopeAction::Cancel));
    }

    #[test]
    fn test_unrelated_message() {
        let routed = assistant().handle("ciao!", "trip", "anna").unwrap();
        assert!(!routed.is_handled());
        assert!(routed.kind.is_none());
    }
}
