//! Configuration Module
//!
//! Handles loading the demo binary's cache settings from environment variables.

use std::env;
use std::time::Duration;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Time-to-live of cached entries in milliseconds
    pub ttl_ms: u64,
    /// Number of concurrent callers the demo spawns
    pub concurrent_callers: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 128)
    /// - `CACHE_TTL_MS` - Entry time-to-live in milliseconds (default: 60000)
    /// - `DEMO_CALLERS` - Concurrent callers in the demo (default: 8)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.capacity),
            ttl_ms: parse_var("CACHE_TTL_MS").unwrap_or(defaults.ttl_ms),
            concurrent_callers: parse_var("DEMO_CALLERS").unwrap_or(defaults.concurrent_callers),
        }
    }

    /// Returns the configured time-to-live.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: 128,
            ttl_ms: 60_000,
            concurrent_callers: 8,
        }
    }
}
