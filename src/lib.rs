//! Tick Cache - a multi-policy in-memory cache manager for per-tick loops
//!
//! Memoizes expensive derived artifacts (composited frames, decoded
//! assets, computed groupings) behind named, independently configured
//! caches with entry-count and memory ceilings, TTL expiry and LRU, LFU,
//! FIFO or TTL eviction. A single manager, owned by the application's
//! composition root, drives periodic maintenance from the host tick loop.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{
    Cache, CacheConfig, CacheEntry, CacheManager, CacheReport, CacheStats, CostEstimator,
    EstimateCost, EvictionPolicy, FallbackEstimator, FnEstimator, ManagerReport, SizeEstimator,
};
pub use config::Config;
pub use error::ConfigError;
