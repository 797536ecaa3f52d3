//! Cache Store Module
//!
//! One named, independently configured cache: HashMap storage plus an
//! order tracker, with TTL expiry, entry-count and memory ceilings, and a
//! per-cache eviction policy.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tracing::warn;

use crate::cache::{
    CacheEntry, CacheReport, CacheStats, EvictionPolicy, FallbackEstimator, OrderTracker,
    SizeEstimator, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_MEMORY,
};
use crate::error::{ConfigError, Result};

// == Cache Config ==
/// Configuration for one named cache.
///
/// Defaults: 100 entries, 100 MB, LRU, no TTL.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub name: String,
    pub max_entries: usize,
    pub max_memory: usize,
    pub policy: EvictionPolicy,
    pub default_ttl: Option<Duration>,
}

impl CacheConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_entries: DEFAULT_MAX_ENTRIES,
            max_memory: DEFAULT_MAX_MEMORY,
            policy: EvictionPolicy::Lru,
            default_ttl: None,
        }
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn max_memory(mut self, max_memory: usize) -> Self {
        self.max_memory = max_memory;
        self
    }

    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    /// Rejects limits that would make the eviction loop degenerate.
    pub fn validate(&self) -> Result<()> {
        if self.max_entries == 0 {
            return Err(ConfigError::ZeroEntryLimit(self.name.clone()));
        }
        if self.max_memory == 0 {
            return Err(ConfigError::ZeroMemoryLimit(self.name.clone()));
        }
        Ok(())
    }
}

// == Cache ==
/// Generic cache with configurable policy and limits.
///
/// `total_memory` always equals the sum of live entries' estimated sizes;
/// every mutating path below restores that invariant before returning.
#[derive(Debug)]
pub struct Cache<K, V, E = FallbackEstimator> {
    name: String,
    max_entries: usize,
    max_memory: usize,
    policy: EvictionPolicy,
    default_ttl: Option<Duration>,
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Insertion/recency ordering for victim selection
    order: OrderTracker<K>,
    /// Injected cost function
    estimator: E,
    total_memory: usize,
    stats: CacheStats,
}

impl<K, V, E> Cache<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V>,
{
    // == Constructor ==
    /// Creates a cache from a validated configuration and an estimator.
    pub fn new(config: CacheConfig, estimator: E) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            name: config.name,
            max_entries: config.max_entries,
            max_memory: config.max_memory,
            policy: config.policy,
            default_ttl: config.default_ttl,
            entries: HashMap::new(),
            order: OrderTracker::new(),
            estimator,
            total_memory: 0,
            stats: CacheStats::new(),
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Absent or expired keys are misses and return `None`; an expired
    /// entry is removed on the spot. A hit refreshes the entry's access
    /// metadata and, under LRU, its recency position.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            if self.remove_entry(key).is_some() {
                self.stats.record_expiration();
            }
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        if self.policy == EvictionPolicy::Lru {
            self.order.touch(key);
        }
        let entry = self.entries.get_mut(key)?;
        entry.touch();
        Some(&entry.value)
    }

    // == Put ==
    /// Stores a key-value pair with an optional TTL (`None` falls back to
    /// the cache's default TTL).
    ///
    /// An existing entry under the same key is removed first, then the
    /// eviction pass runs sized for the incoming value, then the new entry
    /// is inserted. A value whose cost alone exceeds `max_memory` is still
    /// retained; the ceiling is knowingly exceeded for that one entry.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>) {
        self.remove_entry(&key);

        let size = self.estimator.estimate(&value);
        self.evict_if_needed(size);

        if size > self.max_memory {
            warn!(
                cache = %self.name,
                size,
                max_memory = self.max_memory,
                "single value exceeds the memory ceiling; retaining it anyway"
            );
        }

        let entry = CacheEntry::new(value, ttl.or(self.default_ttl), size);
        self.total_memory += entry.size;
        self.entries.insert(key.clone(), entry);
        self.order.record_insert(key);
    }

    // == Remove ==
    /// Removes an entry by key; returns whether anything was removed.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Empties the cache and zeroes memory accounting and counters.
    /// Limits, policy and default TTL are untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.total_memory = 0;
        self.stats.reset();
    }

    // == Evict Expired ==
    /// Removes every expired entry; returns how many were removed.
    ///
    /// Runs unconditionally at the start of every eviction pass and from
    /// the manager's periodic sweep.
    pub fn evict_expired(&mut self) -> usize {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in &expired_keys {
            self.remove_entry(key);
            self.stats.record_expiration();
        }
        count
    }

    // == Evict One ==
    /// Evicts one entry according to the policy; returns whether anything
    /// was removed. `false` means the store is empty and is the terminal
    /// signal for every reclamation loop.
    pub fn evict_one(&mut self) -> bool {
        let victim = match self.victim_key() {
            Some(key) => key,
            None => return false,
        };

        self.remove_entry(&victim);
        self.stats.record_eviction();
        true
    }

    // == Eviction Pass ==
    /// Bounded reclamation run before every insert:
    /// expired entries first, then the entry-count ceiling, then the
    /// memory ceiling sized for the incoming entry. Each loop stops as
    /// soon as `evict_one` reports an empty store.
    fn evict_if_needed(&mut self, incoming_size: usize) {
        self.evict_expired();

        while self.entries.len() >= self.max_entries {
            if !self.evict_one() {
                break;
            }
        }

        while self.total_memory + incoming_size > self.max_memory {
            if !self.evict_one() {
                break;
            }
        }
    }

    /// Selects the next victim without removing it.
    fn victim_key(&self) -> Option<K> {
        match self.policy {
            // Oldest by recency (LRU) or by insertion (FIFO, TTL).
            EvictionPolicy::Lru | EvictionPolicy::Fifo | EvictionPolicy::Ttl => {
                self.order.oldest().cloned()
            }
            // Minimum access count; scanning oldest-first with a strict
            // comparison breaks ties toward the oldest insertion.
            EvictionPolicy::Lfu => {
                let mut victim: Option<(&K, u64)> = None;
                for key in self.order.iter_oldest_first() {
                    if let Some(entry) = self.entries.get(key) {
                        let replace = match victim {
                            Some((_, min_count)) => entry.access_count < min_count,
                            None => true,
                        };
                        if replace {
                            victim = Some((key, entry.access_count));
                        }
                    }
                }
                victim.map(|(key, _)| key.clone())
            }
        }
    }

    /// Removes an entry and keeps memory accounting and ordering in sync.
    /// All removal paths funnel through here.
    fn remove_entry(&mut self, key: &K) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.total_memory -= entry.size;
        self.order.remove(key);
        Some(entry)
    }

    // == Accessors ==
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates the keys of live entries, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Estimated bytes held by live entries.
    pub fn total_memory(&self) -> usize {
        self.total_memory
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    // == Report ==
    /// Snapshot of the cache's state and counters. Read-only.
    pub fn report(&self) -> CacheReport {
        CacheReport {
            name: self.name.clone(),
            policy: self.policy,
            entries: self.entries.len(),
            memory_bytes: self.total_memory,
            hits: self.stats.hits,
            misses: self.stats.misses,
            evictions: self.stats.evictions,
            expirations: self.stats.expirations,
            hit_rate: self.stats.hit_rate(),
        }
    }
}
