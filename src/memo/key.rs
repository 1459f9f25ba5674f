//! Call Key Module
//!
//! Turns call arguments into cache keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Separates positional arguments from named ones in the hash stream.
const NAMED_MARKER: &[u8] = b"\xff__named__\xff";

// == Call Key ==
/// Incremental builder for a hashed cache key.
///
/// Positional arguments are hashed in order. The first named argument writes
/// a marker first, so `f(a, b)` and `f(a, b = ...)` produce different keys.
///
/// ```
/// use senko_cache::memo::CallKey;
///
/// let plain = CallKey::new().arg("Maxee").finish();
/// let named = CallKey::new().arg("Maxee").named("loud", &true).finish();
/// assert_ne!(plain, named);
/// ```
#[derive(Debug, Default)]
pub struct CallKey {
    hasher: DefaultHasher,
    named: bool,
}

impl CallKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a positional argument.
    pub fn arg<T: Hash + ?Sized>(mut self, value: &T) -> Self {
        value.hash(&mut self.hasher);
        self
    }

    /// Adds a named argument. Call after all positional arguments.
    pub fn named<T: Hash + ?Sized>(mut self, name: &str, value: &T) -> Self {
        if !self.named {
            self.hasher.write(NAMED_MARKER);
            self.named = true;
        }
        name.hash(&mut self.hasher);
        value.hash(&mut self.hasher);
        self
    }

    pub fn finish(self) -> u64 {
        self.hasher.finish()
    }
}

// == Default Key Function ==
/// Hashes the full argument value (usually a tuple) into a key.
pub fn hash_key<A: Hash + ?Sized>(args: &A) -> u64 {
    CallKey::new().arg(args).finish()
}

/// Maps every call to the same key, so the first result is reused for all
/// arguments.
pub fn ignore_args<A: ?Sized>(_args: &A) {}
