//! In-memory cache implementation with clock-driven expiry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use scribe_core::ports::{Cache, CacheError, Clock};

use crate::clock::SystemClock;

struct CacheEntry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Data is lost on process restart.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            clock,
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        entry
            .expires_at
            .map(|exp| self.clock.now() >= exp)
            .unwrap_or(false)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let store = self.store.read().await;
        let entry = store.get(key)?;

        if self.is_expired(entry) {
            drop(store);
            let mut store = self.store.write().await;
            // Re-check: a writer may have refreshed the entry in between.
            if store.get(key).is_some_and(|entry| self.is_expired(entry)) {
                store.remove(key);
            }
            return None;
        }

        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        let expires_at = match ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| CacheError::Operation(e.to_string()))?;
                Some(self.clock.now() + ttl)
            }
            None => None,
        };

        let mut store = self.store.write().await;
        // Expired entries under keys nobody reads again are dropped here.
        store.retain(|_, entry| !self.is_expired(entry));
        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        store.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.store.write().await.clear();
        Ok(())
    }
}
