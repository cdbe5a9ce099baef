//! Caching layer for metadata lookups.
//!
//! Provides [`MemoryCache`], a process-local TTL cache with at-most-one
//! outstanding fetch per key, built from [`CacheEntry`] slots.
//!
//! The pipeline owns two instances: one for generated content ids and one for
//! full metadata records. Keys are namespaced (`content-id:` / `record:`) so the
//! two never collide even if they share storage.

mod entry;
mod memory_cache;

pub use entry::CacheEntry;
pub use memory_cache::MemoryCache;

/// Key prefix for metadata record entries.
pub const RECORD_KEY_PREFIX: &str = "record:";
/// Key prefix for generated content id entries.
pub const CONTENT_ID_KEY_PREFIX: &str = "content-id:";

pub fn record_key(lookup_id: &str) -> String {
    format!("{}{}", RECORD_KEY_PREFIX, lookup_id)
}

pub fn content_id_key(lookup_id: &str) -> String {
    format!("{}{}", CONTENT_ID_KEY_PREFIX, lookup_id)
}
