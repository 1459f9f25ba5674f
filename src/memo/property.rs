//! Cached Properties
//!
//! A per-instance slot that remembers the result of a zero-argument getter.

use std::convert::Infallible;
use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

// == Cached Property ==
/// Lazily computed value owned by one instance.
///
/// Embed a `CachedProperty` as a field and route the getter through
/// [`get`](Self::get). Without a TTL the first computed value is kept for
/// the lifetime of the slot; with a TTL it is recomputed on the first access
/// after the TTL has elapsed since the last computation.
///
/// The slot is not locked while the getter runs, so the getter may read other
/// cached properties of the same instance. Two threads racing on an empty
/// slot may both compute; the later write wins.
///
/// Slots built without [`named`](Self::named) are labelled with the source
/// location that created them, e.g. `cached_property@src/user.rs:14`.
///
/// ```
/// use senko_cache::memo::CachedProperty;
///
/// struct Addition {
///     a: i32,
///     b: i32,
///     result: CachedProperty<i32>,
/// }
///
/// impl Addition {
///     fn result(&self) -> i32 {
///         self.result.get(|| self.a + self.b)
///     }
/// }
///
/// let sum = Addition { a: 1, b: 2, result: CachedProperty::new() };
/// assert_eq!(sum.result(), 3);
/// ```
#[derive(Debug)]
pub struct CachedProperty<V> {
    slot: String,
    ttl: Option<Duration>,
    state: Mutex<Option<CacheEntry<V>>>,
}

impl<V> Default for CachedProperty<V> {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CachedProperty<V> {
    // == Constructors ==
    /// An empty slot that never expires.
    #[track_caller]
    pub fn new() -> Self {
        let caller = Location::caller();
        Self {
            slot: format!("cached_property@{}:{}", caller.file(), caller.line()),
            ttl: None,
            state: Mutex::new(None),
        }
    }

    /// An empty slot whose value is recomputed once `ttl` has elapsed.
    #[track_caller]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::new()
        }
    }

    /// An empty slot with a name used in diagnostics.
    ///
    /// # Errors
    /// [`CacheError::InvalidIdentifier`] unless `slot` is a valid identifier
    /// (a letter or `_` followed by letters, digits or `_`).
    pub fn named(slot: impl Into<String>) -> Result<Self> {
        let slot = slot.into();
        if !is_identifier(&slot) {
            return Err(CacheError::InvalidIdentifier(slot));
        }
        Ok(Self {
            slot,
            ttl: None,
            state: Mutex::new(None),
        })
    }

    /// Sets or clears the TTL, keeping the slot name.
    pub fn ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    // == Get ==
    /// Returns the cached value, computing it with `compute` when the slot is
    /// empty or stale.
    pub fn get(&self, compute: impl FnOnce() -> V) -> V
    where
        V: Clone,
    {
        match self.try_get(|| Ok::<V, Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get`](Self::get) for fallible getters. An error leaves the slot
    /// as it was.
    pub fn try_get<E>(
        &self,
        compute: impl FnOnce() -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E>
    where
        V: Clone,
    {
        if let Some(value) = self.fresh(Instant::now()) {
            return Ok(value);
        }

        trace!(slot = %self.slot, "computing cached property");
        let value = compute()?;
        *self.lock() = Some(CacheEntry::new(value.clone(), Instant::now()));
        Ok(value)
    }

    /// Empties the slot so the next access recomputes.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    /// True when the slot holds a value that has not expired.
    pub fn is_populated(&self) -> bool {
        let now = Instant::now();
        self.lock()
            .as_ref()
            .is_some_and(|entry| !self.is_stale(entry, now))
    }

    fn fresh(&self, now: Instant) -> Option<V>
    where
        V: Clone,
    {
        self.lock()
            .as_ref()
            .filter(|entry| !self.is_stale(entry, now))
            .map(|entry| entry.value.clone())
    }

    fn is_stale(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        self.ttl.is_some_and(|ttl| entry.is_expired(ttl, now))
    }

    fn lock(&self) -> MutexGuard<'_, Option<CacheEntry<V>>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}
