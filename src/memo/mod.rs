//! Memoization Module
//!
//! Wrappers that serve repeat calls from a cache instead of recomputing.
//!
//! # Wrappers
//! - [`CachedFunction`] / [`AsyncCachedFunction`]: one fixed cache
//! - [`CachedMethod`] / [`AsyncCachedMethod`]: cache resolved from the receiver
//! - [`CachedProperty`]: one slot per instance, optional TTL
//!
//! Blocking and async wrappers are separate types: a blocking wrapper takes a
//! `std::sync::Mutex` lock, an async one a `tokio::sync::Mutex` lock, and
//! neither converts one calling convention into the other.
//!
//! A failing computation (`try_call`, `try_get`) stores nothing.

mod function;
mod key;
mod method;
mod property;
mod shared;

pub use function::{AsyncCachedFunction, CachedFunction};
pub use key::{hash_key, ignore_args, CallKey};
pub use method::{AsyncCachedMethod, CachedMethod, MethodFuture};
pub use property::CachedProperty;
pub use shared::SharedCache;
