//! Per-key critical sections around the read-modify-write cycle

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use travel_chat_core::ContextKey;

/// One mutex per context key, created on demand and dropped when idle
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: DashMap<ContextKey, Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `key`
    pub fn with_lock<T>(&self, key: &ContextKey, f: impl FnOnce() -> T) -> T {
        // Clone the Arc out so the shard guard is released before blocking
        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        drop(lock);
        self.locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    /// Keys with a lock currently allocated
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
