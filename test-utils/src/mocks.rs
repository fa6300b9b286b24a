//! Mock implementations for testing.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use service_kit::cache::{CacheClient, CacheValue, MemoryCache};
use service_kit::error::Result;
use tokio::sync::RwLock;

/// A recorded `set_key` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCall {
    /// Key
    pub key: String,
    /// Value as passed in
    pub value: CacheValue,
    /// Requested expiration
    pub expiration: Option<Duration>,
}

/// Cache that stores in memory and records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingCache {
    inner: MemoryCache,
    calls: Arc<RwLock<Vec<SetCall>>>,
    reads: Arc<AtomicUsize>,
}

impl RecordingCache {
    /// Create an empty recording cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes seen so far.
    pub async fn set_calls(&self) -> Vec<SetCall> {
        self.calls.read().await.clone()
    }

    /// Number of reads seen so far.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheClient for RecordingCache {
    async fn set_key(
        &self,
        key: &str,
        value: CacheValue,
        expiration: Option<Duration>,
    ) -> Result<()> {
        self.calls.write().await.push(SetCall {
            key: key.to_string(),
            value: value.clone(),
            expiration,
        });
        self.inner.set_key(key, value, expiration).await
    }

    async fn get_key(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.get_key(key).await
    }
}

/// Health checker whose outcome can be flipped from the test.
#[derive(Debug, Clone)]
pub struct ToggleChecker {
    up: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl ToggleChecker {
    /// Create a checker that starts healthy.
    #[must_use]
    pub fn healthy() -> Self {
        Self {
            up: Arc::new(AtomicBool::new(true)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make subsequent checks pass or fail.
    pub fn set_up(&self, up: bool) {
        self.up.store(up, Ordering::SeqCst);
    }

    /// Number of checks run.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Closure to hand to `Dispatcher::register_dependency`.
    #[must_use]
    pub fn checker(&self) -> impl Fn() -> std::result::Result<(), String> + Send + Sync + 'static {
        let this = self.clone();
        move || {
            this.calls.fetch_add(1, Ordering::SeqCst);
            if this.up.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err("dependency is down".to_string())
            }
        }
    }
}
