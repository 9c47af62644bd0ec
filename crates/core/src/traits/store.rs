//! Conversation context store port
//!
//! Backends live in the agent crate. The trait is synchronous: the engine
//! never suspends while a dialogue turn is processed.

use std::time::Duration;

use crate::conversation::{ContextKey, ContextPatch, ConversationContext};
use crate::error::StoreError;

/// Keyed store of active dialogues
///
/// Absence of a key means the dialogue is idle.
pub trait ContextStore: Send + Sync {
    /// Load the context for `key`
    fn get(&self, key: &ContextKey) -> Result<Option<ConversationContext>, StoreError>;

    /// Insert a new context. Fails with `AlreadyExists` if one is present.
    fn create(
        &self,
        key: &ContextKey,
        ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError>;

    /// Merge `patch` into the stored context. Fails with `NotFound` if absent.
    fn update(
        &self,
        key: &ContextKey,
        patch: ContextPatch,
    ) -> Result<ConversationContext, StoreError>;

    /// Overwrite the stored context if its version still equals `ctx.version`
    ///
    /// Returns the stored copy with the bumped version.
    fn replace(
        &self,
        key: &ContextKey,
        ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError>;

    /// Remove the context. Returns whether one was present.
    fn delete(&self, key: &ContextKey) -> Result<bool, StoreError>;

    /// Remove contexts not written for longer than `ttl`. Returns the count.
    fn purge_expired(&self, ttl: Duration) -> Result<usize, StoreError>;

    /// Number of stored contexts
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Whether contexts are shared between engine instances
    fn is_distributed(&self) -> bool;
}
