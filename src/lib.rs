//! Senko Cache - in-process caches and memoization
//!
//! Provides bounded FIFO, LRU and TTL caches plus wrappers that memoize
//! functions, methods and properties on top of them.

pub mod cache;
pub mod config;
pub mod error;
pub mod memo;

pub use cache::{BoundedCache, Cache, LruCache, TtlCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use memo::SharedCache;
