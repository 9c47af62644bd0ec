//! Core types for the guided travel-record conversation engine
//!
//! This crate provides foundational types used across all other crates:
//! - Record kinds and interpreted field values
//! - Conversation context and its state machine
//! - Interpreter results and field kinds
//! - Response envelopes and decoded input events
//! - Traits for pluggable stores and clocks
//! - Error types

pub mod conversation;
pub mod envelope;
pub mod error;
pub mod input;
pub mod parse;
pub mod record;
pub mod traits;

pub use conversation::{ContextKey, ContextPatch, ConversationContext, ConversationState};
pub use envelope::{CompletionOutcome, EnvelopeAction, ResponseEnvelope, UiComponent, UiProps};
pub use error::StoreError;
pub use input::{ControlToken, InputEvent};
pub use parse::{FieldKind, ParseResult};
pub use record::{has_value, FieldValue, RecordData, RecordKind};
pub use traits::{Clock, ContextStore, FixedClock, SystemClock};
