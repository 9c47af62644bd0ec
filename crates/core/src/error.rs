//! Error types shared by every crate in the workspace

use thiserror::Error;

use crate::conversation::ContextKey;

/// Context store errors
///
/// `NotFound` on a mutation is a control-flow bug in the caller, not a
/// user-facing condition, and must be propagated rather than ignored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No conversation context for {0}")]
    NotFound(ContextKey),

    #[error("A conversation context already exists for {0}")]
    AlreadyExists(ContextKey),

    #[error("Stale context for {key}: expected version {expected}, found {found}")]
    VersionConflict {
        key: ContextKey,
        expected: u64,
        found: u64,
    },

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("Failed to (de)serialize context: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
