//! TTL Cache Module
//!
//! LRU cache whose entries expire a fixed time after they were written.

use std::fmt;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{Cache, CacheEntry, CacheStats, LruCache};
use crate::error::{CacheError, Result};

// == TTL Cache ==
/// An LRU cache with a time-to-live for every entry.
///
/// Each `put` stamps the entry with the current instant. An entry whose age
/// exceeds the TTL is logically absent.
///
/// Expiry is lazy: there is no background timer. Every `get`, `has`, `put`,
/// `pop`, `remove` and `len` first sweeps all expired entries, so callers
/// never see a stale hit, but an expired entry keeps its capacity slot until
/// the next such call. When a new key would exceed the capacity after the
/// sweep, the least recently used entry is evicted.
#[derive(Debug)]
pub struct TtlCache<K: Hash + Eq, V> {
    inner: LruCache<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq + Clone, V> TtlCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, at least 1
    /// * `ttl` - Lifetime of each entry, must be non-zero
    pub fn new(capacity: usize, ttl: Duration) -> Result<Self> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl);
        }

        Ok(Self {
            inner: LruCache::new(capacity)?,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Remaining ==
    /// Time left before `key` expires, or `None` if it is absent.
    ///
    /// Sweeps first; does not count as a use.
    pub fn remaining(&mut self, key: &K) -> Option<Duration> {
        let now = Instant::now();
        self.sweep(now);
        self.inner
            .base
            .entries
            .get(key)
            .map(|entry| entry.ttl_remaining(self.ttl, now))
    }

    // == Sweep ==
    /// Removes every entry older than the TTL as of `now`.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn sweep(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let base = &mut self.inner.base;
        let expired: Vec<K> = base
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            base.entries.remove(key);
        }

        let removed = expired.len();

        if removed > 0 {
            base.stats.record_expirations(removed);
            base.stats.set_total_entries(base.entries.len());
            debug!(removed, remaining = base.entries.len(), "swept expired entries");
        }
        removed
    }
}

impl<K: Hash + Eq + Clone, V> Cache<K, V> for TtlCache<K, V> {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn len(&mut self) -> usize {
        self.sweep(Instant::now());
        self.inner.len()
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.sweep(Instant::now());
        self.inner.get(key).map(|entry| &entry.value)
    }

    fn has(&mut self, key: &K) -> bool {
        self.sweep(Instant::now());
        self.inner.has(key)
    }

    fn put(&mut self, key: K, value: V) {
        let now = Instant::now();
        self.sweep(now);
        self.inner.put(key, CacheEntry::new(value, now));
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.sweep(Instant::now());
        self.inner.remove(key).map(|entry| entry.value)
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    /// Counters as of the last operation; `total_entries` may still include
    /// entries that expired since then.
    fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}

impl<K, V> fmt::Display for TtlCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TtlCache(size={}, capacity={}, ttl={:?})",
            self.inner.base.entries.len(),
            self.inner.base.capacity,
            self.ttl
        )
    }
}
