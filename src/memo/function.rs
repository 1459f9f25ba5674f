//! Cached Functions
//!
//! Memoizing wrappers for free functions and closures, in a blocking and an
//! async flavour.

use std::convert::Infallible;
use std::future::Future;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use crate::cache::Cache;
use crate::memo::{hash_key, SharedCache};

// == Cached Function ==
/// Memoizes a blocking function.
///
/// The wrapped function takes its arguments as one value `A` (usually a
/// tuple). The key function maps `&A` to the cache key; it defaults to
/// [`hash_key`].
///
/// Without a lock, concurrent misses for the same key may each run the
/// function and the last write wins. With a lock, a miss takes the lock,
/// re-checks the cache and only then computes, so each key is computed once.
///
/// ```
/// use senko_cache::cache::TtlCache;
/// use senko_cache::memo::{CachedFunction, SharedCache};
/// use std::time::Duration;
///
/// let cache = SharedCache::new(TtlCache::new(64, Duration::from_secs(60)).unwrap());
/// let greet = CachedFunction::new(cache, |(name,): (String,)| format!("You're cool, {name}!"));
///
/// assert_eq!(greet.call(("Maxee".to_string(),)), "You're cool, Maxee!");
/// ```
pub struct CachedFunction<A, F, C, KF = fn(&A) -> u64> {
    func: F,
    cache: SharedCache<C>,
    key: KF,
    lock: Option<Arc<Mutex<()>>>,
    _args: PhantomData<fn(A)>,
}

impl<A: Hash, F, C> CachedFunction<A, F, C> {
    /// Wraps `func`, keying calls with [`hash_key`].
    pub fn new(cache: SharedCache<C>, func: F) -> Self {
        Self {
            func,
            cache,
            key: hash_key::<A>,
            lock: None,
            _args: PhantomData,
        }
    }
}

impl<A, F, C, KF> CachedFunction<A, F, C, KF> {
    /// Replaces the key function.
    pub fn with_key<K, KF2>(self, key: KF2) -> CachedFunction<A, F, C, KF2>
    where
        KF2: Fn(&A) -> K,
    {
        CachedFunction {
            func: self.func,
            cache: self.cache,
            key,
            lock: self.lock,
            _args: PhantomData,
        }
    }

    /// Serializes misses through `lock`, which may be shared with other
    /// wrappers.
    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn cache(&self) -> &SharedCache<C> {
        &self.cache
    }

    // == Call ==
    /// Returns the cached value for `args`, computing and storing it on a miss.
    pub fn call<K, V>(&self, args: A) -> V
    where
        KF: Fn(&A) -> K,
        F: Fn(A) -> V,
        C: Cache<K, V>,
        V: Clone,
    {
        match self.try_call_with(args, |args| Ok::<V, Infallible>((self.func)(args))) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Try Call ==
    /// Like [`call`](Self::call) for fallible functions: only `Ok` values are
    /// cached and an error leaves the key unpopulated.
    pub fn try_call<K, V, E>(&self, args: A) -> Result<V, E>
    where
        KF: Fn(&A) -> K,
        F: Fn(A) -> Result<V, E>,
        C: Cache<K, V>,
        V: Clone,
    {
        self.try_call_with(args, |args| (self.func)(args))
    }

    fn try_call_with<K, V, E>(
        &self,
        args: A,
        compute: impl FnOnce(A) -> Result<V, E>,
    ) -> Result<V, E>
    where
        KF: Fn(&A) -> K,
        C: Cache<K, V>,
        V: Clone,
    {
        let key = (self.key)(&args);
        self.cache.get_or_compute(key, self.lock.as_deref(), || compute(args))
    }
}

// == Async Cached Function ==
/// Memoizes a function returning a future.
///
/// Same contract as [`CachedFunction`]; the optional lock is a
/// `tokio::sync::Mutex` so waiting for it suspends instead of blocking. If
/// the call is cancelled while waiting for the lock or for the wrapped
/// future, nothing is stored and the lock is released.
pub struct AsyncCachedFunction<A, F, C, KF = fn(&A) -> u64> {
    func: F,
    cache: SharedCache<C>,
    key: KF,
    lock: Option<Arc<tokio::sync::Mutex<()>>>,
    _args: PhantomData<fn(A)>,
}

impl<A: Hash, F, C> AsyncCachedFunction<A, F, C> {
    /// Wraps `func`, keying calls with [`hash_key`].
    pub fn new(cache: SharedCache<C>, func: F) -> Self {
        Self {
            func,
            cache,
            key: hash_key::<A>,
            lock: None,
            _args: PhantomData,
        }
    }
}

impl<A, F, C, KF> AsyncCachedFunction<A, F, C, KF> {
    /// Replaces the key function.
    pub fn with_key<K, KF2>(self, key: KF2) -> AsyncCachedFunction<A, F, C, KF2>
    where
        KF2: Fn(&A) -> K,
    {
        AsyncCachedFunction {
            func: self.func,
            cache: self.cache,
            key,
            lock: self.lock,
            _args: PhantomData,
        }
    }

    pub fn with_lock(mut self, lock: Arc<tokio::sync::Mutex<()>>) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn cache(&self) -> &SharedCache<C> {
        &self.cache
    }

    // == Call ==
    /// Returns the cached value for `args`, awaiting the function on a miss.
    pub async fn call<K, V, Fut>(&self, args: A) -> V
    where
        KF: Fn(&A) -> K,
        F: Fn(A) -> Fut,
        Fut: Future<Output = V>,
        C: Cache<K, V>,
        V: Clone,
    {
        let key = (self.key)(&args);
        let compute = || {
            let pending = (self.func)(args);
            async move { Ok::<V, Infallible>(pending.await) }
        };
        match self
            .cache
            .get_or_compute_async(key, self.lock.as_deref(), compute)
            .await
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Try Call ==
    /// Async counterpart of [`CachedFunction::try_call`].
    pub async fn try_call<K, V, E, Fut>(&self, args: A) -> Result<V, E>
    where
        KF: Fn(&A) -> K,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>>,
        C: Cache<K, V>,
        V: Clone,
    {
        let key = (self.key)(&args);
        self.cache
            .get_or_compute_async(key, self.lock.as_deref(), || (self.func)(args))
            .await
    }
}
