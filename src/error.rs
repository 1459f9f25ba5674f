//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for caches and memoizing wrappers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not present (strict accessors only)
    #[error("Key not found")]
    KeyNotFound,

    /// Capacity must be at least one entry
    #[error("Invalid capacity: {0}, must be at least 1")]
    InvalidCapacity(usize),

    /// Time-to-live must be non-zero
    #[error("Invalid TTL: must be greater than zero")]
    InvalidTtl,

    /// Slot name is not a valid identifier
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
