//! Text processing for the travel-record conversation engine
//!
//! This crate provides the natural-language side of the dialogue:
//! - **Interpreters**: one pure function per semantic field kind (dates,
//!   datetimes, closed-set types, currency, cost, confirmation, contact,
//!   location, time, free text)
//! - **Trigger detection**: decides whether a message starts a new dialogue
//! - **Fast path**: extracts several transportation fields from one message
//!
//! # Example
//!
//! ```ignore
//! use travel_chat_text_processing::IntelligentParser;
//! use travel_chat_core::FieldKind;
//!
//! let parser = IntelligentParser::default();
//! let result = parser.parse(FieldKind::Cost, "320 euro");
//! assert!(result.success);
//! ```

pub mod fast_path;
pub mod interpreters;
pub mod triggers;

pub use fast_path::{ExtractedField, FastPathExtraction, TransportationExtractor};
pub use interpreters::categories::{
    accommodation_type_options, currency_options, transportation_type_options, AccommodationType,
    TransportationType,
};
pub use interpreters::{interpreter_for, IntelligentParser, Interpreter};
pub use triggers::{is_cancel_request, TriggerDetector};
