//! Cache Module
//!
//! Provides bounded in-memory caches with FIFO, LRU and TTL eviction.
//!
//! All three engines share the [`Cache`] contract:
//! - soft accessors (`get`, `get_or`, `has`, `remove`, `remove_or`) never fail
//!   on a missing key
//! - strict accessors (`try_get`, `pop`) return [`CacheError::KeyNotFound`]
//! - `len() <= capacity()` holds after every operation
//!
//! The caches are plain single-owner structures. Share one between tasks or
//! threads through [`crate::memo::SharedCache`] or another external lock;
//! recency bookkeeping in `get` is a mutation for that purpose.

mod bounded;
mod entry;
mod lru;
mod stats;
mod ttl;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use lru::LruCache;
pub use stats::CacheStats;
pub use ttl::TtlCache;

use crate::error::{CacheError, Result};

// == Cache Trait ==
/// Fixed-capacity key-value store.
///
/// Methods that may reorder entries or sweep expired ones take `&mut self`,
/// including `len`.
pub trait Cache<K, V> {
    /// Maximum number of entries.
    fn capacity(&self) -> usize;

    /// Current number of live entries.
    fn len(&mut self) -> usize;

    fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// Looks up `key`, counting a hit or a miss.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Returns a copy of the stored value or `fallback` when absent.
    fn get_or(&mut self, key: &K, fallback: V) -> V
    where
        V: Clone,
    {
        self.get(key).cloned().unwrap_or(fallback)
    }

    /// Indexed access: like `get`, but a miss is an error.
    fn try_get(&mut self, key: &K) -> Result<&V> {
        self.get(key).ok_or(CacheError::KeyNotFound)
    }

    /// Containment check. Never reorders and never counts as a lookup.
    fn has(&mut self, key: &K) -> bool;

    /// Inserts or overwrites `key`, evicting one entry if a new key would
    /// exceed capacity.
    fn put(&mut self, key: K, value: V);

    /// Removes `key` and returns its value, failing when absent.
    fn pop(&mut self, key: &K) -> Result<V> {
        self.remove(key).ok_or(CacheError::KeyNotFound)
    }

    /// Removes `key` and returns its value if present.
    fn remove(&mut self, key: &K) -> Option<V>;

    fn remove_or(&mut self, key: &K, fallback: V) -> V {
        self.remove(key).unwrap_or(fallback)
    }

    /// Drops every entry. Counters are kept.
    fn clear(&mut self);

    /// Snapshot of the cache counters.
    fn stats(&self) -> CacheStats;
}
