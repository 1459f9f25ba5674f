//! Cached Methods
//!
//! Memoizing wrappers whose cache is looked up on the receiver, so every
//! instance keeps its own results.

use std::convert::Infallible;
use std::future::Future;
use std::hash::Hash;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::cache::Cache;
use crate::memo::{hash_key, SharedCache};

/// Boxed future returned by methods wrapped in [`AsyncCachedMethod`]. It may
/// borrow the receiver.
pub type MethodFuture<'a, R> = Pin<Box<dyn Future<Output = R> + Send + 'a>>;

// == Cached Method ==
/// Memoizes a blocking method.
///
/// `provider` maps the receiver to the cache holding its results; the key
/// function only sees the arguments, never the receiver.
///
/// ```
/// use senko_cache::cache::LruCache;
/// use senko_cache::memo::{CachedMethod, SharedCache};
///
/// struct Greeter {
///     cache: SharedCache<LruCache<u64, String>>,
/// }
///
/// let greeting = CachedMethod::new(
///     |greeter: &Greeter| greeter.cache.clone(),
///     |_: &Greeter, name: &'static str| format!("Hello {name}!"),
/// );
///
/// let greeter = Greeter { cache: SharedCache::new(LruCache::new(128).unwrap()) };
/// assert_eq!(greeting.call(&greeter, "Maxee"), "Hello Maxee!");
/// ```
pub struct CachedMethod<T: ?Sized, A, P, F, KF = fn(&A) -> u64> {
    provider: P,
    func: F,
    key: KF,
    lock: Option<Arc<Mutex<()>>>,
    _marker: PhantomData<fn(&T, A)>,
}

impl<T: ?Sized, A: Hash, P, F> CachedMethod<T, A, P, F> {
    pub fn new(provider: P, func: F) -> Self {
        Self {
            provider,
            func,
            key: hash_key::<A>,
            lock: None,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, A, P, F, KF> CachedMethod<T, A, P, F, KF> {
    /// Replaces the key function.
    pub fn with_key<K, KF2>(self, key: KF2) -> CachedMethod<T, A, P, F, KF2>
    where
        KF2: Fn(&A) -> K,
    {
        CachedMethod {
            provider: self.provider,
            func: self.func,
            key,
            lock: self.lock,
            _marker: PhantomData,
        }
    }

    /// Serializes misses through `lock`. The lock is shared by every
    /// receiver.
    pub fn with_lock(mut self, lock: Arc<Mutex<()>>) -> Self {
        self.lock = Some(lock);
        self
    }

    // == Call ==
    /// Returns `this`'s cached value for `args`, computing it on a miss.
    pub fn call<C, K, V>(&self, this: &T, args: A) -> V
    where
        P: Fn(&T) -> SharedCache<C>,
        KF: Fn(&A) -> K,
        F: Fn(&T, A) -> V,
        C: Cache<K, V>,
        V: Clone,
    {
        let compute = |args: A| Ok::<V, Infallible>((self.func)(this, args));
        match self.try_call_with(this, args, compute) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    // == Try Call ==
    /// Only `Ok` results are cached.
    pub fn try_call<C, K, V, E>(&self, this: &T, args: A) -> Result<V, E>
    where
        P: Fn(&T) -> SharedCache<C>,
        KF: Fn(&A) -> K,
        F: Fn(&T, A) -> Result<V, E>,
        C: Cache<K, V>,
        V: Clone,
    {
        self.try_call_with(this, args, |args| (self.func)(this, args))
    }

    fn try_call_with<C, K, V, E>(
        &self,
        this: &T,
        args: A,
        compute: impl FnOnce(A) -> Result<V, E>,
    ) -> Result<V, E>
    where
        P: Fn(&T) -> SharedCache<C>,
        KF: Fn(&A) -> K,
        C: Cache<K, V>,
        V: Clone,
    {
        let cache = (self.provider)(this);
        let key = (self.key)(&args);
        cache.get_or_compute(key, self.lock.as_deref(), || compute(args))
    }
}

// == Async Cached Method ==
/// Memoizes an async method.
///
/// The wrapped method returns a [`MethodFuture`] so its future can borrow
/// the receiver; `R` is that future's output.
pub struct AsyncCachedMethod<T: ?Sized, A, R, P, F, KF = fn(&A) -> u64> {
    provider: P,
    func: F,
    key: KF,
    lock: Option<Arc<tokio::sync::Mutex<()>>>,
    _marker: PhantomData<fn(&T, A) -> R>,
}

impl<T: ?Sized, A: Hash, R, P, F> AsyncCachedMethod<T, A, R, P, F>
where
    F: for<'a> Fn(&'a T, A) -> MethodFuture<'a, R>,
{
    pub fn new(provider: P, func: F) -> Self {
        Self {
            provider,
            func,
            key: hash_key::<A>,
            lock: None,
            _marker: PhantomData,
        }
    }
}

impl<T: ?Sized, A, R, P, F, KF> AsyncCachedMethod<T, A, R, P, F, KF>
where
    F: for<'a> Fn(&'a T, A) -> MethodFuture<'a, R>,
{
    /// Replaces the key function.
    pub fn with_key<K, KF2>(self, key: KF2) -> AsyncCachedMethod<T, A, R, P, F, KF2>
    where
        KF2: Fn(&A) -> K,
    {
        AsyncCachedMethod {
            provider: self.provider,
            func: self.func,
            key,
            lock: self.lock,
            _marker: PhantomData,
        }
    }

    pub fn with_lock(mut self, lock: Arc<tokio::sync::Mutex<()>>) -> Self {
        self.lock = Some(lock);
        self
    }

    // == Call ==
    /// Returns `this`'s cached value for `args`, awaiting the method on a
    /// miss.
    pub async fn call<C, K>(&self, this: &T, args: A) -> R
    where
        P: Fn(&T) -> SharedCache<C>,
        KF: Fn(&A) -> K,
        C: Cache<K, R>,
        R: Clone,
    {
        let cache = (self.provider)(this);
        let key = (self.key)(&args);
        let compute = || {
            let pending = (self.func)(this, args);
            async move { Ok::<R, Infallible>(pending.await) }
        };
        match cache
            .get_or_compute_async(key, self.lock.as_deref(), compute)
            .await
        {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<T: ?Sized, A, V, E, P, F, KF> AsyncCachedMethod<T, A, Result<V, E>, P, F, KF>
where
    F: for<'a> Fn(&'a T, A) -> MethodFuture<'a, Result<V, E>>,
{
    // == Try Call ==
    /// Only `Ok` results are cached.
    pub async fn try_call<C, K>(&self, this: &T, args: A) -> Result<V, E>
    where
        P: Fn(&T) -> SharedCache<C>,
        KF: Fn(&A) -> K,
        C: Cache<K, V>,
        V: Clone,
    {
        let cache = (self.provider)(this);
        let key = (self.key)(&args);
        cache
            .get_or_compute_async(key, self.lock.as_deref(), || (self.func)(this, args))
            .await
    }
}
