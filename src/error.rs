//! Error types for the cache subsystem
//!
//! Provides unified error handling using thiserror.
//!
//! Cache lookups never fail: a missing or expired key is a miss, not an
//! error. The only fallible surface is configuration, which fails fast at
//! `create_cache` time so it can never corrupt memory accounting later.

use thiserror::Error;

// == Config Error Enum ==
/// Configuration errors raised when registering a cache.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `max_entries` must allow at least one entry
    #[error("cache '{0}': max_entries must be at least 1")]
    ZeroEntryLimit(String),

    /// `max_memory` must allow at least one byte
    #[error("cache '{0}': max_memory must be at least 1 byte")]
    ZeroMemoryLimit(String),

    /// Policy name did not match any known eviction policy
    #[error("unknown eviction policy: {0:?} (expected lru, lfu, fifo or ttl)")]
    UnknownPolicy(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
