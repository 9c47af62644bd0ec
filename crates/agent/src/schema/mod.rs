//! Field schema registry
//!
//! One ordered table of field descriptors per record kind. The table and its
//! traversal policy fully parameterize the dialogue state machine.

mod accommodation;
mod transportation;

pub use accommodation::ACCOMMODATION_SCHEMA;
pub use transportation::TRANSPORTATION_SCHEMA;

use travel_chat_core::{has_value, ConversationContext, FieldKind, RecordData, RecordKind};

/// How the next field to ask is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalPolicy {
    /// Every field in declaration order, optional ones included
    Sequential,
    /// Only required fields still missing from the data
    RequiredOnly,
}

/// One data point to collect
#[derive(Clone, Copy)]
pub struct FieldDescriptor {
    pub key: &'static str,
    /// Display name in summaries
    pub label: &'static str,
    pub required: bool,
    pub prompt: &'static str,
    /// Selects the interpreter
    pub kind: FieldKind,
    /// Raw-text gate run before interpretation
    pub validate: fn(&str) -> bool,
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("required", &self.required)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Raw-text validators
pub mod validators {
    pub fn non_empty(raw: &str) -> bool {
        !raw.trim().is_empty()
    }

    pub fn accept_any(_raw: &str) -> bool {
        true
    }

    pub fn contains_digit(raw: &str) -> bool {
        raw.chars().any(|c| c.is_ascii_digit())
    }

    /// Bounded free text
    pub fn short_text(raw: &str) -> bool {
        let len = raw.trim().chars().count();
        (1..=200).contains(&len)
    }
}

/// Ordered field table for one record kind
#[derive(Debug)]
pub struct FieldSchema {
    pub kind: RecordKind,
    pub policy: TraversalPolicy,
    pub fields: &'static [FieldDescriptor],
}

impl FieldSchema {
    /// Registry lookup
    pub fn for_kind(kind: RecordKind) -> &'static FieldSchema {
        match kind {
            RecordKind::Accommodation => &ACCOMMODATION_SCHEMA,
            RecordKind::Transportation => &TRANSPORTATION_SCHEMA,
        }
    }

    pub fn field(&self, key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn first_field(&self) -> Option<&'static FieldDescriptor> {
        self.fields.first()
    }

    /// Resolve the next field to ask per the traversal policy
    pub fn next_field(&self, ctx: &ConversationContext) -> Option<&'static FieldDescriptor> {
        match self.policy {
            TraversalPolicy::Sequential => self
                .fields
                .iter()
                .find(|f| !ctx.is_completed(f.key)),
            TraversalPolicy::RequiredOnly => self
                .fields
                .iter()
                .find(|f| f.required && !has_value(&ctx.data, f.key)),
        }
    }

    /// Required keys with no value yet, in declaration order
    pub fn missing_required(&self, data: &RecordData) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required && !has_value(data, f.key))
            .map(|f| f.key)
            .collect()
    }

    /// Keep only keys this schema declares
    pub fn retain_known(&self, data: RecordData) -> RecordData {
        data.into_iter().filter(|(k, _)| self.contains(k)).collect()
    }
}
