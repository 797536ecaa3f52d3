//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support and
//! access bookkeeping for the eviction policies.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the stored value plus the metadata the eviction
/// policies need. The key lives as the map key in the owning cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Creation instant (monotonic)
    pub created_at: Instant,
    /// Instant of the most recent access
    pub last_accessed: Instant,
    /// Number of times this entry has been read
    pub access_count: u64,
    /// Maximum lifespan, None = never expires
    pub ttl: Option<Duration>,
    /// Estimated cost in bytes, computed once at insertion
    pub size: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry with an optional TTL and a precomputed size.
    pub fn new(value: V, ttl: Option<Duration>, size: usize) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            ttl,
            size,
        }
    }

    // == Touch ==
    /// Records a read: bumps the access count and refreshes `last_accessed`.
    pub fn touch(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL.
    ///
    /// Expiry is lazy: nothing observes this transition until the next
    /// `get` or sweep touches the entry. An entry with no TTL never
    /// expires.
    pub fn is_expired(&self) -> bool {
        match self.ttl {
            Some(ttl) => self.created_at.elapsed() >= ttl,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining lifespan, or None if the entry never expires.
    ///
    /// Returns `Duration::ZERO` once the TTL has elapsed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.ttl
            .map(|ttl| ttl.saturating_sub(self.created_at.elapsed()))
    }
}
