//! Bounded Cache Module
//!
//! Fixed-capacity cache evicting by insertion order.

use std::fmt;
use std::hash::Hash;

use linked_hash_map::LinkedHashMap;
use tracing::trace;

use crate::cache::{Cache, CacheStats};
use crate::error::{CacheError, Result};

// == Bounded Cache ==
/// Fixed-capacity cache with FIFO eviction.
///
/// When adding a new key would exceed the capacity, the entry inserted
/// first is evicted. Reads never reorder entries and overwriting a key
/// keeps its original position.
///
/// Storage grows with the number of entries, not with `capacity`.
#[derive(Debug)]
pub struct BoundedCache<K: Hash + Eq, V> {
    pub(super) entries: LinkedHashMap<K, V>,
    pub(super) capacity: usize,
    pub(super) stats: CacheStats,
}

impl<K: Hash + Eq + Clone, V> BoundedCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            entries: LinkedHashMap::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Keys from the next eviction candidate to the newest entry.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    // == Evict ==
    /// Removes the entry at the front of the order.
    pub(super) fn evict(&mut self) -> Option<(K, V)> {
        let evicted = self.entries.pop_front();
        if evicted.is_some() {
            self.stats.record_eviction();
            trace!(capacity = self.capacity, "evicted front entry");
        }
        evicted
    }

    // == Insert ==
    /// Shared put path: overwrite in place, or make room for a new key and
    /// append it.
    pub(super) fn insert(&mut self, key: K, value: V) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict();
        }
        self.entries.insert(key, value);
        self.stats.set_total_entries(self.entries.len());
    }

    pub(super) fn lookup(&mut self, key: &K) -> Option<&V> {
        let value = self.entries.get(key);
        if value.is_some() {
            self.stats.record_hit();
        } else {
            self.stats.record_miss();
        }
        value
    }
}

impl<K: Hash + Eq + Clone, V> Cache<K, V> for BoundedCache<K, V> {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn len(&mut self) -> usize {
        self.entries.len()
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        self.lookup(key)
    }

    fn has(&mut self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn put(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
        value
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }
}

impl<K, V> fmt::Display for BoundedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundedCache(size={}, capacity={})",
            self.entries.len(),
            self.capacity
        )
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_new() {
        let mut cache: BoundedCache<i32, i32> = BoundedCache::new(1).unwrap();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.capacity(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounded_huge_capacity_allocates_lazily() {
        let mut cache = BoundedCache::new(usize::MAX).unwrap();
        assert_eq!(cache.capacity(), usize::MAX);

        for key in 0..100u64 {
            cache.put(key, key * 2);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.get(&42), Some(&84));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_bounded_zero_capacity_rejected() {
        let result = BoundedCache::<i32, i32>::new(0);
        assert!(matches!(result, Err(CacheError::InvalidCapacity(0))));
    }

    #[test]
    fn test_bounded_insert_evicts_first() {
        let mut cache = BoundedCache::new(1).unwrap();

        cache.put(1, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(&1));
        assert_eq!(cache.try_get(&1), Ok(&1));
        assert!(cache.has(&1));

        cache.put(2, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(&2));
        assert!(cache.has(&2));
        assert!(!cache.has(&1));
    }

    #[test]
    fn test_bounded_fifo_ignores_reads() {
        let mut cache = BoundedCache::new(2).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);

        // Reading "a" does not protect it at this level
        cache.get(&"a");
        cache.put("c", 3);

        assert!(!cache.has(&"a"));
        assert_eq!(cache.keys().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_bounded_overwrite_does_not_evict() {
        let mut cache = BoundedCache::new(1).unwrap();
        cache.put(1, "old");
        cache.put(1, "new");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(&"new"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_bounded_overwrite_keeps_position() {
        let mut cache = BoundedCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(1, 10);
        cache.put(3, 3);

        assert!(!cache.has(&1));
        assert!(cache.has(&2));
        assert!(cache.has(&3));
    }

    #[test]
    fn test_bounded_fallbacks() {
        let mut cache: BoundedCache<i32, i32> = BoundedCache::new(2).unwrap();
        assert_eq!(cache.get(&7), None);
        assert_eq!(cache.get_or(&7, -1), -1);
        assert_eq!(cache.remove_or(&7, 0), 0);
        assert_eq!(cache.try_get(&7), Err(CacheError::KeyNotFound));
    }

    #[test]
    fn test_bounded_pop_and_remove() {
        let mut cache = BoundedCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);

        assert_eq!(cache.pop(&1), Ok(1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.remove(&2), Some(2));
        assert_eq!(cache.len(), 0);

        assert_eq!(cache.pop(&1), Err(CacheError::KeyNotFound));
        assert_eq!(cache.remove(&1), None);
    }

    #[test]
    fn test_bounded_clear() {
        let mut cache = BoundedCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);

        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.stats().total_entries, 0);
    }

    #[test]
    fn test_bounded_stats() {
        let mut cache = BoundedCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        cache.get(&3);
        cache.get(&1);
        cache.has(&3);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 2);
    }

    #[test]
    fn test_bounded_display() {
        let mut cache = BoundedCache::new(4).unwrap();
        cache.put(1, 1);
        assert_eq!(cache.to_string(), "BoundedCache(size=1, capacity=4)");
    }
}
