//! In-memory context store for single-instance deployments

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use travel_chat_core::{
    Clock, ContextKey, ContextPatch, ContextStore, ConversationContext, StoreError, SystemClock,
};

/// Process-local store, one entry per active dialogue
pub struct InMemoryContextStore {
    contexts: RwLock<HashMap<ContextKey, ConversationContext>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            contexts: RwLock::new(HashMap::new()),
            clock,
        }
    }

    fn stamp(&self, ctx: &mut ConversationContext) {
        ctx.version += 1;
        ctx.updated_at = self.clock.now();
    }
}

impl Default for InMemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextStore for InMemoryContextStore {
    fn get(&self, key: &ContextKey) -> Result<Option<ConversationContext>, StoreError> {
        Ok(self.contexts.read().get(key).cloned())
    }

    fn create(
        &self,
        key: &ContextKey,
        mut ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError> {
        let mut contexts = self.contexts.write();
        if contexts.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.clone()));
        }
        ctx.version = 0;
        self.stamp(&mut ctx);
        contexts.insert(key.clone(), ctx.clone());
        Ok(ctx)
    }

    fn update(
        &self,
        key: &ContextKey,
        patch: ContextPatch,
    ) -> Result<ConversationContext, StoreError> {
        let mut contexts = self.contexts.write();
        let ctx = contexts
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        patch.apply(ctx);
        self.stamp(ctx);
        Ok(ctx.clone())
    }

    fn replace(
        &self,
        key: &ContextKey,
        mut ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError> {
        let mut contexts = self.contexts.write();
        let stored = contexts
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;
        if stored.version != ctx.version {
            return Err(StoreError::VersionConflict {
                key: key.clone(),
                expected: ctx.version,
                found: stored.version,
            });
        }
        self.stamp(&mut ctx);
        *stored = ctx.clone();
        Ok(ctx)
    }

    fn delete(&self, key: &ContextKey) -> Result<bool, StoreError> {
        Ok(self.contexts.write().remove(key).is_some())
    }

    fn purge_expired(&self, ttl: Duration) -> Result<usize, StoreError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| StoreError::Backend(format!("Invalid TTL: {}", e)))?;
        let now = self.clock.now();

        let mut contexts = self.contexts.write();
        let before = contexts.len();
        contexts.retain(|key, ctx| {
            let keep = ctx.idle_for(now) <= ttl;
            if !keep {
                tracing::debug!(
                    key = %key,
                    conversation_id = %ctx.conversation_id,
                    state = %ctx.state,
                    "Expiring idle conversation context"
                );
            }
            keep
        });
        Ok(before - contexts.len())
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.contexts.read().len())
    }

    fn is_distributed(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use travel_chat_core::{ConversationState, FieldValue, FixedClock, RecordData, RecordKind};

    fn key() -> ContextKey {
        ContextKey::new(RecordKind::Accommodation, "trip-1", "user-1")
    }

    #[test]
    fn test_create_and_get() {
        let store = InMemoryContextStore::new();
        let created = store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();
        assert_eq!(created.version, 1);

        let loaded = store.get(&key()).unwrap().unwrap();
        assert_eq!(loaded.conversation_id, created.conversation_id);
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_create_twice_fails() {
        let store = InMemoryContextStore::new();
        let ctx = ConversationContext::new(RecordKind::Accommodation);
        store.create(&key(), ctx.clone()).unwrap();
        assert!(matches!(
            store.create(&key(), ctx),
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let store = InMemoryContextStore::new();
        let other = ContextKey::new(RecordKind::Transportation, "trip-1", "user-1");
        store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();
        store
            .create(&other, ConversationContext::new(RecordKind::Transportation))
            .unwrap();
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_update_missing_context_fails_loudly() {
        let store = InMemoryContextStore::new();
        let result = store.update(&key(), ContextPatch::default());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_update_merges_patch() {
        let store = InMemoryContextStore::new();
        store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();

        let mut data = RecordData::new();
        data.insert("name".into(), FieldValue::text("Hotel Roma"));
        let updated = store
            .update(
                &key(),
                ContextPatch {
                    state: Some(ConversationState::Collecting),
                    current_field: Some(Some("type".into())),
                    data: Some(data),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.current_field.as_deref(), Some("type"));
        assert_eq!(updated.data["name"], FieldValue::text("Hotel Roma"));
    }

    #[test]
    fn test_replace_detects_stale_version() {
        let store = InMemoryContextStore::new();
        let created = store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();

        let mut first = created.clone();
        first.retry_count = 1;
        store.replace(&key(), first).unwrap();

        let mut stale = created;
        stale.retry_count = 2;
        let err = store.replace(&key(), stale).unwrap_err();
        assert_eq!(
            err,
            StoreError::VersionConflict {
                key: key(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_replace_missing_context_fails() {
        let store = InMemoryContextStore::new();
        let ctx = ConversationContext::new(RecordKind::Accommodation);
        assert!(matches!(
            store.replace(&key(), ctx),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_purge_expired() {
        let written_at = Utc.with_ymd_and_hms(2025, 4, 24, 10, 0, 0).unwrap();
        let store = InMemoryContextStore::with_clock(Arc::new(FixedClock::new(written_at)));
        store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();

        assert_eq!(store.purge_expired(Duration::from_secs(3600)).unwrap(), 0);
        assert_eq!(store.purge_expired(Duration::ZERO).unwrap(), 0);

        // Same store contents seen from two hours later
        let later = InMemoryContextStore::with_clock(Arc::new(FixedClock::new(
            written_at + chrono::Duration::hours(2),
        )));
        let ctx = store.get(&key()).unwrap().unwrap();
        later.contexts.write().insert(key(), ctx);
        assert_eq!(later.purge_expired(Duration::from_secs(3600)).unwrap(), 1);
        assert!(later.is_empty().unwrap());
    }

    #[test]
    fn test_delete() {
        let store = InMemoryContextStore::new();
        store
            .create(&key(), ConversationContext::new(RecordKind::Accommodation))
            .unwrap();
        assert!(store.delete(&key()).unwrap());
        assert!(!store.delete(&key()).unwrap());
        assert!(store.get(&key()).unwrap().is_none());
    }
}
