//! Cache slot with optional expiry.

use std::time::Duration;
use tokio::time::Instant;

/// A cached value with its creation time and optional expiry.
///
/// An entry is never served once `expires_at` has been reached.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    /// Creates an entry that expires `ttl` from now, or never when `ttl` is `None`.
    pub fn new(key: impl Into<String>, value: V, ttl: Option<Duration>) -> Self {
        let created_at = Instant::now();
        Self {
            key: key.into(),
            value,
            created_at,
            expires_at: ttl.map(|ttl| created_at + ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expiry| now >= expiry)
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
