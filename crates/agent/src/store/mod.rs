//! Context store backends, per-key locking and TTL sweeping

mod locks;
mod memory;
#[cfg(feature = "redis-store")]
mod redis;
mod sweeper;

pub use locks::KeyedLocks;
pub use memory::InMemoryContextStore;
#[cfg(feature = "redis-store")]
pub use redis::RedisContextStore;
pub use sweeper::ContextSweeper;

use std::sync::Arc;

use travel_chat_config::{StoreBackend, StoreConfig};
use travel_chat_core::ContextStore;

use crate::AgentError;

/// Build the configured store backend
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn ContextStore>, AgentError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory context store");
            Ok(Arc::new(InMemoryContextStore::new()))
        },
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis => {
            let store = RedisContextStore::connect(
                &config.redis_url,
                &config.key_prefix,
                config.context_ttl(),
            )?;
            tracing::info!(prefix = %config.key_prefix, "Using Redis context store");
            Ok(Arc::new(store))
        },
        #[cfg(not(feature = "redis-store"))]
        StoreBackend::Redis => Err(AgentError::Initialization(
            "store.backend = redis requires the `redis-store` feature".to_string(),
        )),
    }
}
