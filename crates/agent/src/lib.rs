//! Guided data-collection dialogues for travel records
//!
//! Features:
//! - Field schema registry per record kind
//! - Pluggable context stores (in-memory, Redis) with per-key locking and TTL sweep
//! - Pure dialogue reducer over `(context, event)`
//! - Accommodation and transportation orchestrators
//! - A router that dispatches messages between the two domains

pub mod dialogue;
pub mod messages;
pub mod orchestrator;
pub mod router;
pub mod schema;
pub mod store;

pub use dialogue::{DialogueEngine, EngineOptions, Opening, Transition};
pub use orchestrator::{
    AccommodationOrchestrator, DomainOrchestrator, Orchestrator, TransportationOrchestrator,
};
pub use router::{RoutedResponse, TravelAssistant};
pub use schema::{FieldDescriptor, FieldSchema, TraversalPolicy};
#[cfg(feature = "redis-store")]
pub use store::RedisContextStore;
pub use store::{build_store, ContextSweeper, InMemoryContextStore, KeyedLocks};

use thiserror::Error;
use travel_chat_core::StoreError;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The context points at a field its schema does not declare
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Initialization error: {0}")]
    Initialization(String),
}
