//! Read-through session cache.
//!
//! The auth middleware asks the cache for the caller's identity before
//! touching Postgres. The cache is strictly best-effort: every Redis
//! failure is logged and treated as a miss, so a Redis outage degrades
//! to store lookups instead of failing requests.

use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

/// Cached session entries live for 10 minutes
pub const SESSION_CACHE_TTL: u64 = 600;

fn session_key(user_id: Uuid) -> String {
    format!("user:{}", user_id)
}

/// Maps a user id to the email it was issued tokens for
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Look up the cached email for a user. `None` means miss or error.
    async fn get(&self, user_id: Uuid) -> Option<String>;

    /// Cache the email for a user with the standard TTL
    async fn set(&self, user_id: Uuid, email: &str);

    /// Drop the cached entry, e.g. after a password reset
    async fn invalidate(&self, user_id: Uuid);
}

/// Redis-backed session cache
#[derive(Clone)]
pub struct RedisSessionCache {
    redis: ConnectionManager,
}

impl RedisSessionCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, user_id: Uuid) -> Option<String> {
        let mut conn = self.redis.clone();
        match conn.get::<_, Option<String>>(session_key(user_id)).await {
            Ok(value) => value,
            Err(e) => {
                warn!(user_id = %user_id, "Session cache read failed: {}", e);
                None
            }
        }
    }

    async fn set(&self, user_id: Uuid, email: &str) {
        let mut conn = self.redis.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(session_key(user_id), email, SESSION_CACHE_TTL)
            .await
        {
            warn!(user_id = %user_id, "Session cache write failed: {}", e);
        }
    }

    async fn invalidate(&self, user_id: Uuid) {
        let mut conn = self.redis.clone();
        if let Err(e) = conn.del::<_, ()>(session_key(user_id)).await {
            warn!(user_id = %user_id, "Session cache invalidation failed: {}", e);
        }
    }
}

/// In-memory session cache for tests (entries never expire)
#[derive(Clone, Default)]
pub struct InMemorySessionCache {
    entries: Arc<RwLock<HashMap<Uuid, String>>>,
}

impl InMemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn get(&self, user_id: Uuid) -> Option<String> {
        self.entries.read().await.get(&user_id).cloned()
    }

    async fn set(&self, user_id: Uuid, email: &str) {
        self.entries
            .write()
            .await
            .insert(user_id, email.to_string());
    }

    async fn invalidate(&self, user_id: Uuid) {
        self.entries.write().await.remove(&user_id);
    }
}
