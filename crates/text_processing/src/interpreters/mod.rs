//! Natural-language field interpreters
//!
//! One pure function per semantic field kind, all with the same shape:
//! raw utterance in, [`ParseResult`] out. The dialogue engine only ever calls
//! them through [`interpreter_for`] / [`IntelligentParser`], so any of them can
//! be swapped for a stronger parser without touching the state machine.
//!
//! ## Static Regex Patterns
//!
//! Patterns are compiled once using `once_cell::sync::Lazy` and never mutated.

pub mod categories;
pub mod money;
pub mod temporal;
pub mod text;

use std::sync::Arc;

use travel_chat_core::{Clock, FieldKind, ParseResult, SystemClock};

pub use categories::{parse_accommodation_type, parse_currency, parse_transportation_type};
pub use money::parse_cost;
pub use temporal::{parse_date, parse_datetime, parse_time};
pub use text::{parse_confirmation, parse_contact, parse_free_text, parse_location};

/// Common interpreter signature
pub type Interpreter = fn(&str, &dyn Clock) -> ParseResult;

/// Resolve the interpreter for a field kind
pub fn interpreter_for(kind: FieldKind) -> Interpreter {
    match kind {
        FieldKind::Date => parse_date,
        FieldKind::DateTime => parse_datetime,
        FieldKind::AccommodationType => |input: &str, _: &dyn Clock| parse_accommodation_type(input),
        FieldKind::TransportationType => |input: &str, _: &dyn Clock| parse_transportation_type(input),
        FieldKind::Currency => |input: &str, _: &dyn Clock| parse_currency(input),
        FieldKind::Cost => |input: &str, _: &dyn Clock| parse_cost(input),
        FieldKind::Confirmation => |input: &str, _: &dyn Clock| parse_confirmation(input),
        FieldKind::Contact => |input: &str, _: &dyn Clock| parse_contact(input),
        FieldKind::Location => |input: &str, _: &dyn Clock| parse_location(input),
        FieldKind::Time => |input: &str, _: &dyn Clock| parse_time(input),
        FieldKind::Text => |input: &str, _: &dyn Clock| parse_free_text(input),
    }
}

/// Dispatcher binding the interpreters to a clock
#[derive(Clone)]
pub struct IntelligentParser {
    clock: Arc<dyn Clock>,
}

impl IntelligentParser {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Interpret `input` as a value of `kind`
    pub fn parse(&self, kind: FieldKind, input: &str) -> ParseResult {
        let result = interpreter_for(kind)(input, self.clock.as_ref());
        tracing::debug!(
            kind = ?kind,
            success = result.success,
            confidence = result.confidence,
            "Interpreted field value"
        );
        result
    }
}

impl Default for IntelligentParser {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for IntelligentParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntelligentParser").finish_non_exhaustive()
    }
}

/// Whole-word containment on lowercased text
///
/// Word boundaries are only enforced on keyword edges that are alphanumeric,
/// so symbols such as `€` still match when glued to a number.
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let check_start = needle.chars().next().is_some_and(char::is_alphanumeric);
    let check_end = needle.chars().last().is_some_and(char::is_alphanumeric);

    haystack.match_indices(needle).any(|(idx, _)| {
        let before_ok = !check_start
            || haystack[..idx]
                .chars()
                .last()
                .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = !check_end
            || haystack[idx + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// First category whose keyword list has a whole-word hit, in table order
pub(crate) fn match_category<T: Copy>(text: &str, table: &[(T, &[&str])]) -> Option<T> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| contains_word(&lower, kw)))
        .map(|(category, _)| *category)
}
