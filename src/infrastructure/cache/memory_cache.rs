//! Process-local TTL cache with single-flight fetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::entry::CacheEntry;

/// In-memory cache keyed by string with lazy TTL expiry.
///
/// [`get_or_fetch`](Self::get_or_fetch) guarantees at most one outstanding
/// fetch per key: concurrent callers for the same key wait for the first
/// fetch and then read its result from the cache. Failed fetches are not
/// cached.
///
/// The cache is owned by whoever builds the pipeline; there is no global
/// instance.
pub struct MemoryCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<V: Clone + Send + Sync> MemoryCache<V> {
    /// Creates an empty cache; `name` labels log lines and metrics.
    pub fn new(name: &'static str) -> Self {
        debug!(cache = name, "Using in-memory cache");
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the live value for `key`, evicting it if it has expired.
    pub async fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired()) {
            entries.remove(key);
            debug!(cache = self.name, key, "Cache EVICT (expired)");
        }
        None
    }

    /// Stores `value` under `key`, expiring after `ttl` (never when `None`).
    pub async fn insert(&self, key: &str, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(key, value, ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        debug!(cache = self.name, key, ttl_secs = ttl.map(|t| t.as_secs()), "Cache SET");
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its result.
    ///
    /// # Errors
    ///
    /// Returns the fetch's own error unchanged. Nothing is cached on error.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            debug!(cache = self.name, key, "Cache HIT");
            metrics::counter!("metadata_cache_hits_total", "cache" => self.name).increment(1);
            return Ok(value);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(key.to_string()).or_default())
        };

        let result = {
            let _guard = key_lock.lock().await;

            // Another caller may have filled the slot while we waited.
            if let Some(value) = self.get(key).await {
                debug!(cache = self.name, key, "Cache HIT (after wait)");
                metrics::counter!("metadata_cache_hits_total", "cache" => self.name).increment(1);
                Ok(value)
            } else {
                debug!(cache = self.name, key, "Cache MISS");
                metrics::counter!("metadata_cache_misses_total", "cache" => self.name).increment(1);
                match fetch().await {
                    Ok(value) => {
                        self.insert(key, value.clone(), Some(ttl)).await;
                        Ok(value)
                    }
                    Err(e) => Err(e),
                }
            }
        };

        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &key_lock) && Arc::strong_count(lock) == 2)
        {
            in_flight.remove(key);
        }

        result
    }

    pub async fn invalidate(&self, key: &str) {
        if self.entries.write().await.remove(key).is_some() {
            debug!(cache = self.name, key, "Cache INVALIDATE");
        }
    }

    /// Drops every expired entry; returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();
        if removed > 0 {
            debug!(cache = self.name, removed, "Cache PURGE");
        }
        removed
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
