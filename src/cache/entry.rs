//! Cache Entry Module
//!
//! Timestamped values stored by the TTL cache and cached properties.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value paired with the instant it was last written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the value was written
    pub stored_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            stored_at: now,
        }
    }

    /// Time elapsed between the write and `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals `ttl` exactly is still
    /// live; it expires once its age strictly exceeds `ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) > ttl
    }

    // == Time To Live ==
    /// Returns how long the entry has left, or zero once it has expired.
    pub fn ttl_remaining(&self, ttl: Duration, now: Instant) -> Duration {
        ttl.saturating_sub(self.age(now))
    }
}
