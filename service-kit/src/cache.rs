//! Key/value cache clients.
//!
//! [`RedisCache`] talks to the Redis instance described by a validated
//! `REDIS` parameter; [`MemoryCache`] keeps entries in process and is handy
//! for tests and single-instance tools.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::RedisConnectionInfo;
use crate::error::Result;

/// Value stored in a cache. Strings and bytes are stored as is; anything
/// else is stored as its JSON encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheValue {
    /// Plain text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// JSON-encoded value
    Json(String),
}

impl CacheValue {
    /// Encode a serializable value as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_string(value)?))
    }

    /// Bytes written to the cache.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) | Self::Json(text) => text.as_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Consume into the bytes written to the cache.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Text(text) | Self::Json(text) => text.into_bytes(),
            Self::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Cache operations shared by every backend.
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Store a value. `None` or a zero expiration keeps the key forever.
    async fn set_key(
        &self,
        key: &str,
        value: CacheValue,
        expiration: Option<Duration>,
    ) -> Result<()>;

    /// Read a value, `None` when the key is missing or expired.
    async fn get_key(&self, key: &str) -> Result<Option<Vec<u8>>>;
}

fn effective_ttl(expiration: Option<Duration>) -> Option<Duration> {
    expiration.filter(|ttl| !ttl.is_zero())
}

/// Redis-backed cache on a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

impl RedisCache {
    /// Connect using a validated Redis parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the first
    /// connection fails.
    pub async fn connect(info: &RedisConnectionInfo) -> Result<Self> {
        let client = redis::Client::open(info.client_url())?;
        let conn = ConnectionManager::new(client).await?;
        info!(address = %info.address(), "Connected to Redis");
        Ok(Self { conn })
    }

    /// Wrap an existing connection manager.
    #[must_use]
    pub const fn from_connection(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CacheClient for RedisCache {
    async fn set_key(
        &self,
        key: &str,
        value: CacheValue,
        expiration: Option<Duration>,
    ) -> Result<()> {
        let mut conn = self.conn.clone();
        let bytes = value.into_bytes();

        match effective_ttl(expiration) {
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                conn.pset_ex::<_, _, ()>(key, bytes, millis).await?;
            }
            None => conn.set::<_, _, ()>(key, bytes).await?,
        }

        debug!(key, ?expiration, "Cache key set");
        Ok(())
    }

    async fn get_key(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }
}

struct MemoryEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// In-process cache with per-key expiry.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, MemoryEntry>>>,
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache").finish_non_exhaustive()
    }
}

impl MemoryCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }

    /// True when no live entry remains.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn set_key(
        &self,
        key: &str,
        value: CacheValue,
        expiration: Option<Duration>,
    ) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.into_bytes(),
                expires_at: effective_ttl(expiration).map(|ttl| now + ttl),
            },
        );
        Ok(())
    }

    async fn get_key(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strings_and_bytes_are_stored_raw() {
        assert_eq!(CacheValue::from("card").as_bytes(), b"card");
        assert_eq!(CacheValue::from(vec![0_u8, 159]).into_bytes(), vec![0, 159]);
    }

    #[test]
    fn test_other_values_are_json_encoded() {
        #[derive(Serialize)]
        struct Card {
            id: u32,
        }

        let value = CacheValue::json(&Card { id: 7 }).unwrap();
        assert_eq!(value, CacheValue::Json(r#"{"id":7}"#.to_string()));
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set_key("card:1", "payload".into(), None).await.unwrap();

        let value = cache.get_key("card:1").await.unwrap();
        assert_eq!(value, Some(b"payload".to_vec()));
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get_key("missing").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new();
        cache
            .set_key("key", "value".into(), Some(Duration::from_millis(1)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(cache.get_key("key").await.unwrap(), None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_zero_expiration_never_expires() {
        let cache = MemoryCache::new();
        cache
            .set_key("key", "value".into(), Some(Duration::ZERO))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(cache.get_key("key").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new();
        cache.set_key("k", "one".into(), None).await.unwrap();
        cache.set_key("k", "two".into(), None).await.unwrap();

        assert_eq!(cache.get_key("k").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_clients_are_usable_as_trait_objects() {
        let cache: Arc<dyn CacheClient> = Arc::new(MemoryCache::new());
        cache
            .set_key("k", CacheValue::json(&[1, 2, 3]).unwrap(), None)
            .await
            .unwrap();
        assert_eq!(cache.get_key("k").await.unwrap(), Some(b"[1,2,3]".to_vec()));
    }
}
