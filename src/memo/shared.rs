//! Shared Cache Handle
//!
//! Cloneable handle through which memoizing wrappers reach a cache.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::cache::Cache;

// == Shared Cache ==
/// A cache behind `Arc<Mutex<_>>`.
///
/// The mutex only serializes single cache operations. It is never held while
/// a wrapped computation runs or across an `.await`.
#[derive(Debug, Default)]
pub struct SharedCache<C> {
    inner: Arc<Mutex<C>>,
}

impl<C> Clone for SharedCache<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> SharedCache<C> {
    pub fn new(cache: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Runs `f` with exclusive access to the cache.
    ///
    /// A poisoned mutex is recovered: cache operations never leave the
    /// structure half-updated.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// True when both handles point at the same cache.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn lookup<K, V>(&self, key: &K) -> Option<V>
    where
        C: Cache<K, V>,
        V: Clone,
    {
        self.with(|cache| cache.get(key).cloned())
    }

    pub(crate) fn store<K, V>(&self, key: K, value: V)
    where
        C: Cache<K, V>,
    {
        self.with(|cache| cache.put(key, value));
    }

    // == Get Or Compute ==
    /// Check-then-populate for blocking wrappers.
    ///
    /// A hit never touches `lock`. On a miss the lock (if any) is taken and
    /// the cache re-checked before `compute` runs. Only `Ok` values are
    /// stored.
    pub(crate) fn get_or_compute<K, V, E>(
        &self,
        key: K,
        lock: Option<&Mutex<()>>,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E>
    where
        C: Cache<K, V>,
        V: Clone,
    {
        if let Some(value) = self.lookup(&key) {
            trace!("memoized hit");
            return Ok(value);
        }
        trace!("memoized miss");

        let _guard = match lock {
            Some(lock) => {
                let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(value) = self.lookup(&key) {
                    debug!("value stored while waiting for lock");
                    return Ok(value);
                }
                Some(guard)
            }
            None => None,
        };

        let value = compute()?;
        self.store(key, value.clone());
        Ok(value)
    }

    /// Async counterpart of [`get_or_compute`](Self::get_or_compute).
    ///
    /// Dropping the returned future while it waits for `lock` or for
    /// `compute` stores nothing and releases the lock.
    pub(crate) async fn get_or_compute_async<K, V, E, Fut>(
        &self,
        key: K,
        lock: Option<&tokio::sync::Mutex<()>>,
        compute: impl FnOnce() -> Fut,
    ) -> Result<V, E>
    where
        C: Cache<K, V>,
        V: Clone,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.lookup(&key) {
            trace!("memoized hit");
            return Ok(value);
        }
        trace!("memoized miss");

        let _guard = match lock {
            Some(lock) => {
                let guard = lock.lock().await;
                if let Some(value) = self.lookup(&key) {
                    debug!("value stored while waiting for lock");
                    return Ok(value);
                }
                Some(guard)
            }
            None => None,
        };

        let value = compute().await?;
        self.store(key, value.clone());
        Ok(value)
    }
}

impl<C> From<C> for SharedCache<C> {
    fn from(cache: C) -> Self {
        Self::new(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruCache;
    use std::time::Duration;

    #[test]
    fn test_clones_share_storage() {
        let shared = SharedCache::new(LruCache::new(4).unwrap());
        let other = shared.clone();

        shared.store("k", 1);
        assert_eq!(other.lookup(&"k"), Some(1));
        assert!(shared.ptr_eq(&other));
        assert!(!shared.ptr_eq(&SharedCache::new(LruCache::new(4).unwrap())));
    }

    #[test]
    fn test_get_or_compute_stores_only_ok() {
        let shared = SharedCache::new(LruCache::new(4).unwrap());
        let lock = Mutex::new(());

        assert_eq!(
            shared.get_or_compute("k", Some(&lock), || Err::<i32, _>("down")),
            Err("down")
        );
        assert!(shared.with(|cache| cache.is_empty()));

        assert_eq!(shared.get_or_compute("k", Some(&lock), || Ok::<_, &str>(1)), Ok(1));
        assert_eq!(shared.get_or_compute("k", None, || Ok::<_, &str>(2)), Ok(1));
    }

    #[tokio::test]
    async fn test_get_or_compute_async_rechecks_after_lock() {
        let shared = SharedCache::new(LruCache::new(4).unwrap());
        let lock = Arc::new(tokio::sync::Mutex::new(()));

        let guard = lock.lock().await;
        let waiting = {
            let shared = shared.clone();
            let lock = lock.clone();
            tokio::spawn(async move {
                shared
                    .get_or_compute_async("k", Some(&lock), || async { Ok::<_, &str>(2) })
                    .await
            })
        };

        // Populated by another caller while the lock is held
        tokio::time::sleep(Duration::from_millis(20)).await;
        shared.store("k", 1);
        drop(guard);

        assert_eq!(waiting.await.unwrap(), Ok(1));
    }

    #[test]
    fn test_with_exposes_full_api() {
        let shared: SharedCache<LruCache<&str, i32>> = LruCache::new(2).unwrap().into();
        shared.store("a", 1);

        let (len, removed) = shared.with(|cache| (cache.len(), cache.remove(&"a")));
        assert_eq!(len, 1);
        assert_eq!(removed, Some(1));
    }
}
