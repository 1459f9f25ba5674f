//! LRU Cache Module
//!
//! Implements Least Recently Used eviction on top of the bounded cache.

use std::fmt;
use std::hash::Hash;

use crate::cache::{BoundedCache, Cache, CacheStats};
use crate::error::Result;

// == LRU Cache ==
/// A Least Recently Used cache.
///
/// An entry counts as used when it is read through `get`/`try_get` or
/// written through `put`. The order is kept as:
/// - Front = least recently used (next eviction candidate)
/// - Back = most recently used
#[derive(Debug)]
pub struct LruCache<K: Hash + Eq, V> {
    pub(super) base: BoundedCache<K, V>,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            base: BoundedCache::new(capacity)?,
        })
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.base.keys()
    }

    /// Returns the least recently used entry without touching it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.base.entries.front()
    }
}

impl<K: Hash + Eq + Clone, V> Cache<K, V> for LruCache<K, V> {
    fn capacity(&self) -> usize {
        self.base.capacity
    }

    fn len(&mut self) -> usize {
        self.base.len()
    }

    // == Get ==
    /// A hit moves the entry to the most recently used end. A miss leaves
    /// the order untouched.
    fn get(&mut self, key: &K) -> Option<&V> {
        self.base.entries.get_refresh(key);
        self.base.lookup(key)
    }

    fn has(&mut self, key: &K) -> bool {
        self.base.has(key)
    }

    // == Put ==
    /// Stores the value as the most recently used entry, evicting the least
    /// recently used one if a new key would exceed capacity.
    fn put(&mut self, key: K, value: V) {
        if let Some(slot) = self.base.entries.get_refresh(&key) {
            *slot = value;
        } else {
            self.base.insert(key, value);
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.base.remove(key)
    }

    fn clear(&mut self) {
        self.base.clear();
    }

    fn stats(&self) -> CacheStats {
        self.base.stats()
    }
}

impl<K, V> fmt::Display for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LruCache(size={}, capacity={})",
            self.base.entries.len(),
            self.base.capacity
        )
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CacheError;

    fn order(cache: &LruCache<&'static str, i32>) -> Vec<&'static str> {
        cache.keys().copied().collect()
    }

    #[test]
    fn test_lru_new() {
        let mut cache: LruCache<i32, i32> = LruCache::new(2).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 2);
        assert!(LruCache::<i32, i32>::new(0).is_err());
    }

    #[test]
    fn test_lru_get_protects_entry() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);
        cache.get(&1);

        cache.put(3, 3);
        assert!(cache.has(&1));
        assert!(!cache.has(&2));
        assert!(cache.has(&3));
    }

    #[test]
    fn test_lru_try_get_counts_as_use() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.try_get(&"a"), Ok(&1));
        assert_eq!(order(&cache), vec!["b", "a"]);
        assert_eq!(cache.try_get(&"zzz"), Err(CacheError::KeyNotFound));
        assert_eq!(order(&cache), vec!["b", "a"]);
    }

    #[test]
    fn test_lru_miss_does_not_reorder() {
        let mut cache = LruCache::new(3).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);

        assert_eq!(cache.get(&"missing"), None);
        assert_eq!(order(&cache), vec!["a", "b"]);
    }

    #[test]
    fn test_lru_put_existing_moves_to_back() {
        let mut cache = LruCache::new(3).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        cache.put("a", 10);
        assert_eq!(order(&cache), vec!["b", "c", "a"]);
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.len(), 3);

        cache.put("d", 4);
        assert!(!cache.has(&"b"));
        assert_eq!(order(&cache), vec!["c", "a", "d"]);
    }

    #[test]
    fn test_lru_has_does_not_reorder() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);

        assert!(cache.has(&"a"));
        assert_eq!(cache.peek_lru(), Some((&"a", &1)));
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut cache = LruCache::new(3).unwrap();
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        cache.get(&"a");
        cache.get(&"c");
        cache.get(&"b");

        assert_eq!(order(&cache), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_lru_overwrite_does_not_evict() {
        let mut cache = LruCache::new(1).unwrap();
        cache.put(1, "old");
        cache.put(1, "new");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(&"new"));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_lru_pop_remove_clear() {
        let mut cache = LruCache::new(2).unwrap();
        cache.put(1, 1);
        cache.put(2, 2);

        assert_eq!(cache.pop(&1), Ok(1));
        assert_eq!(cache.pop(&1), Err(CacheError::KeyNotFound));
        assert_eq!(cache.remove(&2), Some(2));
        assert_eq!(cache.remove_or(&2, 0), 0);

        cache.put(3, 3);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_lru_display() {
        let cache: LruCache<i32, i32> = LruCache::new(8).unwrap();
        assert_eq!(cache.to_string(), "LruCache(size=0, capacity=8)");
    }
}
