//! Redis-backed context store for multi-instance deployments
//!
//! Contexts are stored as JSON strings under `{prefix}:{kind}:{subject}:{requester}`.
//! Every write refreshes the key's expiry, so the idle TTL is enforced by
//! Redis itself and `purge_expired` has nothing to do. Version checks run
//! inside WATCH/MULTI transactions.

use std::time::Duration;

use parking_lot::Mutex;
use redis::Commands;
use travel_chat_core::{ContextKey, ContextPatch, ContextStore, ConversationContext, StoreError};

fn backend(err: redis::RedisError) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn redis_key(prefix: &str, key: &ContextKey) -> String {
    format!("{}:{}", prefix, key.storage_key())
}

/// Outcome of one optimistic write attempt
enum Write {
    Done(ConversationContext),
    Missing,
    Conflict(u64),
    Corrupt(String),
}

pub struct RedisContextStore {
    connection: Mutex<redis::Connection>,
    prefix: String,
    ttl_secs: u64,
}

impl RedisContextStore {
    pub fn connect(url: &str, prefix: &str, ttl: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(backend)?;
        let connection = client.get_connection().map_err(backend)?;
        Ok(Self {
            connection: Mutex::new(connection),
            prefix: prefix.to_string(),
            ttl_secs: ttl.as_secs().max(1),
        })
    }

    /// Read-check-write under WATCH; `mutate` builds the new value from the stored one
    fn write_checked(
        &self,
        key: &ContextKey,
        mut mutate: impl FnMut(ConversationContext) -> Result<ConversationContext, u64>,
    ) -> Result<ConversationContext, StoreError> {
        let storage_key = redis_key(&self.prefix, key);
        let ttl_secs = self.ttl_secs;
        let mut con = self.connection.lock();

        let outcome = redis::transaction(&mut *con, &[&storage_key], |con, pipe| {
            let raw: Option<String> = redis::cmd("GET").arg(&storage_key).query(con)?;
            let Some(raw) = raw else {
                return Ok(Some(Write::Missing));
            };
            let stored: ConversationContext = match serde_json::from_str(&raw) {
                Ok(ctx) => ctx,
                Err(e) => return Ok(Some(Write::Corrupt(e.to_string()))),
            };

            let mut next = match mutate(stored) {
                Ok(next) => next,
                Err(found) => return Ok(Some(Write::Conflict(found))),
            };
            next.version += 1;
            next.touch();
            let payload = match serde_json::to_string(&next) {
                Ok(payload) => payload,
                Err(e) => return Ok(Some(Write::Corrupt(e.to_string()))),
            };

            let committed: Option<()> = pipe
                .cmd("SET")
                .arg(&storage_key)
                .arg(payload)
                .arg("EX")
                .arg(ttl_secs)
                .ignore()
                .query(con)?;
            Ok(committed.map(|_| Write::Done(next)))
        })
        .map_err(backend)?;

        match outcome {
            Write::Done(ctx) => Ok(ctx),
            Write::Missing => Err(StoreError::NotFound(key.clone())),
            Write::Conflict(found) => Err(StoreError::VersionConflict {
                key: key.clone(),
                expected: found.saturating_sub(1),
                found,
            }),
            Write::Corrupt(e) => Err(StoreError::Serialization(e)),
        }
    }
}

impl ContextStore for RedisContextStore {
    fn get(&self, key: &ContextKey) -> Result<Option<ConversationContext>, StoreError> {
        let raw: Option<String> = self
            .connection
            .lock()
            .get(redis_key(&self.prefix, key))
            .map_err(backend)?;
        raw.map(|raw| serde_json::from_str(&raw).map_err(StoreError::from))
            .transpose()
    }

    fn create(
        &self,
        key: &ContextKey,
        mut ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError> {
        ctx.version = 1;
        ctx.touch();
        let payload = serde_json::to_string(&ctx)?;

        let created: Option<String> = redis::cmd("SET")
            .arg(redis_key(&self.prefix, key))
            .arg(payload)
            .arg("NX")
            .arg("EX")
            .arg(self.ttl_secs)
            .query(&mut *self.connection.lock())
            .map_err(backend)?;

        match created {
            Some(_) => Ok(ctx),
            None => Err(StoreError::AlreadyExists(key.clone())),
        }
    }

    fn update(
        &self,
        key: &ContextKey,
        patch: ContextPatch,
    ) -> Result<ConversationContext, StoreError> {
        self.write_checked(key, |mut stored| {
            patch.clone().apply(&mut stored);
            Ok(stored)
        })
    }

    fn replace(
        &self,
        key: &ContextKey,
        ctx: ConversationContext,
    ) -> Result<ConversationContext, StoreError> {
        let expected = ctx.version;
        let result = self.write_checked(key, |stored| {
            if stored.version == expected {
                Ok(ctx.clone())
            } else {
                Err(stored.version)
            }
        });
        match result {
            Err(StoreError::VersionConflict { key, found, .. }) => {
                Err(StoreError::VersionConflict {
                    key,
                    expected,
                    found,
                })
            },
            other => other,
        }
    }

    fn delete(&self, key: &ContextKey) -> Result<bool, StoreError> {
        let removed: i64 = self
            .connection
            .lock()
            .del(redis_key(&self.prefix, key))
            .map_err(backend)?;
        Ok(removed > 0)
    }

    fn purge_expired(&self, _ttl: Duration) -> Result<usize, StoreError> {
        Ok(0)
    }

    fn len(&self) -> Result<usize, StoreError> {
        let pattern = format!("{}:*", self.prefix);
        let mut con = self.connection.lock();
        let keys: redis::Iter<'_, String> = con.scan_match(pattern).map_err(backend)?;
        Ok(keys.count())
    }

    fn is_distributed(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_chat_core::RecordKind;

    #[test]
    fn test_redis_key_layout() {
        let key = ContextKey::new(RecordKind::Accommodation, "trip-1", "user-1");
        assert_eq!(
            redis_key("travel_chat:ctx", &key),
            "travel_chat:ctx:accommodation:trip-1:user-1"
        );
    }
}
