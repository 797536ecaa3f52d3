//! Cache Module
//!
//! Multi-policy in-memory caching: named caches with entry-count and
//! memory ceilings, TTL expiry, pluggable size estimation and a per-cache
//! eviction policy, brokered by a central manager.

mod entry;
mod manager;
mod order;
mod policy;
mod sizer;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use manager::{CacheManager, DEFAULT_MEMORY_CEILING, DEFAULT_SWEEP_INTERVAL};
pub use order::OrderTracker;
pub use policy::EvictionPolicy;
pub use sizer::{
    raster_cost, CostEstimator, EstimateCost, FallbackEstimator, FnEstimator, SizeEstimator,
    FALLBACK_COST,
};
pub use stats::{CacheReport, CacheStats, ManagerReport};
pub use store::{Cache, CacheConfig};

// == Public Constants ==
/// Default per-cache entry limit
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default per-cache memory ceiling in bytes (100 MB)
pub const DEFAULT_MAX_MEMORY: usize = 100 * 1024 * 1024;
