//! Index feed response caching.
//!
//! The index feed is the hottest read path, so its canonical rendering
//! (first page, no explicit page parameter) is cached as an opaque byte
//! blob under a single slot with a short TTL. Readers within the TTL
//! window get the cached bytes verbatim; writers can drop the slot
//! early via [`FeedCache::clear`].

use async_trait::async_trait;
use fred::clients::Client as RedisClient;
use fred::interfaces::KeysInterface;
use fred::types::Expiration;
use quill_common::{AppError, AppResult};
use std::sync::Arc;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// Single-slot cache for the rendered index feed.
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Get the cached response, if present and unexpired.
    async fn get(&self) -> AppResult<Option<Vec<u8>>>;

    /// Store a response, replacing any previous slot contents and
    /// restarting the TTL window.
    async fn set(&self, bytes: &[u8]) -> AppResult<()>;

    /// Drop the slot immediately, regardless of remaining TTL.
    async fn clear(&self) -> AppResult<()>;
}

/// Shared handle to a feed cache implementation.
pub type FeedCacheService = Arc<dyn FeedCache>;

/// Redis-backed feed cache.
#[derive(Clone)]
pub struct RedisFeedCache {
    redis: Arc<RedisClient>,
    key: String,
    ttl_secs: i64,
}

impl RedisFeedCache {
    #[must_use]
    pub fn new(redis: Arc<RedisClient>, key_prefix: &str, ttl_secs: u64) -> Self {
        Self {
            redis,
            key: format!("{key_prefix}:feed:index"),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }
}

#[async_trait]
impl FeedCache for RedisFeedCache {
    async fn get(&self) -> AppResult<Option<Vec<u8>>> {
        let result: Option<Vec<u8>> = self
            .redis
            .get(self.key.as_str())
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        if result.is_some() {
            debug!(key = %self.key, "index feed cache hit");
        } else {
            debug!(key = %self.key, "index feed cache miss");
        }

        Ok(result)
    }

    async fn set(&self, bytes: &[u8]) -> AppResult<()> {
        self.redis
            .set::<(), _, _>(
                self.key.as_str(),
                bytes.to_vec(),
                Some(Expiration::EX(self.ttl_secs)),
                None,
                false,
            )
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.redis
            .del::<(), _>(self.key.as_str())
            .await
            .map_err(|e| AppError::Redis(e.to_string()))?;

        debug!(key = %self.key, "index feed cache cleared");
        Ok(())
    }
}

/// In-process feed cache backed by a timestamped slot.
///
/// Used in tests in place of the Redis-backed store.
pub struct MemoryFeedCache {
    slot: RwLock<Option<(Vec<u8>, Instant)>>,
    ttl: Duration,
}

impl MemoryFeedCache {
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_secs))
    }

    #[must_use]
    pub const fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: RwLock::new(None),
            ttl,
        }
    }
}

#[async_trait]
impl FeedCache for MemoryFeedCache {
    async fn get(&self) -> AppResult<Option<Vec<u8>>> {
        let guard = self
            .slot
            .read()
            .map_err(|_| AppError::Internal("feed cache lock poisoned".to_string()))?;

        Ok(guard.as_ref().and_then(|(bytes, stored_at)| {
            if stored_at.elapsed() < self.ttl {
                Some(bytes.clone())
            } else {
                None
            }
        }))
    }

    async fn set(&self, bytes: &[u8]) -> AppResult<()> {
        let mut guard = self
            .slot
            .write()
            .map_err(|_| AppError::Internal("feed cache lock poisoned".to_string()))?;

        *guard = Some((bytes.to_vec(), Instant::now()));
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut guard = self
            .slot
            .write()
            .map_err(|_| AppError::Internal("feed cache lock poisoned".to_string()))?;

        *guard = None;
        Ok(())
    }
}
