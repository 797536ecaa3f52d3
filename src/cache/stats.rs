//! Cache Statistics Module
//!
//! Tracks per-cache performance counters and builds the serializable
//! reports exposed for diagnostics. Reports are read-only snapshots; they
//! never feed back into cache behavior.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::EvictionPolicy;

// == Cache Stats ==
/// Per-cache performance counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Successful retrievals
    pub hits: u64,
    /// Failed retrievals (key absent or expired)
    pub misses: u64,
    /// Entries removed by policy eviction
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    /// All counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// `hits / (hits + misses)`, or 0.0 when no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Reset ==
    /// Zeroes every counter. Used by `clear()`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Report ==
/// Snapshot of a single cache's state and counters.
#[derive(Debug, Clone, Serialize)]
pub struct CacheReport {
    pub name: String,
    pub policy: EvictionPolicy,
    /// Live entry count
    pub entries: usize,
    /// Estimated bytes held by live entries
    pub memory_bytes: usize,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub hit_rate: f64,
}

// == Manager Report ==
/// Aggregate snapshot across every registered cache.
#[derive(Debug, Clone, Serialize)]
pub struct ManagerReport {
    /// Wall-clock time the snapshot was taken
    pub generated_at: DateTime<Utc>,
    pub total_memory_bytes: usize,
    pub cache_count: usize,
    pub caches: BTreeMap<String, CacheReport>,
}
