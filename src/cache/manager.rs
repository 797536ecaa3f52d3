//! Cache Manager Module
//!
//! Registry of named caches plus the per-tick maintenance driver. One
//! manager instance is constructed at the application's composition root
//! and passed by reference to every subsystem that caches; there is no
//! hidden global instance.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, trace};

use crate::cache::{
    Cache, CacheConfig, CacheReport, FallbackEstimator, ManagerReport, SizeEstimator,
};
use crate::error::Result;

// == Defaults ==
/// Default interval between periodic sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default process-wide memory ceiling across all caches (200 MB).
pub const DEFAULT_MEMORY_CEILING: usize = 200 * 1024 * 1024;

// == Cache Manager ==
/// Centralized broker for all named caches.
///
/// Caches never outlive the manager. All caches under one manager share
/// the key, value and estimator types; heterogeneous deployments model
/// their values as an enum.
#[derive(Debug)]
pub struct CacheManager<K, V, E = FallbackEstimator> {
    caches: HashMap<String, Cache<K, V, E>>,
    /// Prototype estimator, cloned into each created cache
    estimator: E,
    sweep_interval: Duration,
    last_sweep: Instant,
    /// Hard process-wide ceiling, independent of per-cache limits
    memory_ceiling: usize,
}

impl<K, V, E> CacheManager<K, V, E>
where
    K: Eq + Hash + Clone,
    E: SizeEstimator<V> + Clone,
{
    // == Constructor ==
    /// Creates a manager with an explicit estimator and maintenance
    /// parameters.
    pub fn with_estimator(
        estimator: E,
        sweep_interval: Duration,
        memory_ceiling: usize,
    ) -> Self {
        Self {
            caches: HashMap::new(),
            estimator,
            sweep_interval,
            last_sweep: Instant::now(),
            memory_ceiling,
        }
    }

    // == Create Cache ==
    /// Registers a named cache, replacing any cache already registered
    /// under the same name. Replacement discards the prior cache's entries
    /// wholesale; there is no merge.
    pub fn create_cache(&mut self, config: CacheConfig) -> Result<()> {
        let name = config.name.clone();
        let cache = Cache::new(config, self.estimator.clone())?;

        if self.caches.insert(name.clone(), cache).is_some() {
            debug!(cache = %name, "replaced existing cache, prior entries discarded");
        } else {
            debug!(cache = %name, "cache created");
        }
        Ok(())
    }

    // == Lookup ==
    pub fn get_cache(&self, name: &str) -> Option<&Cache<K, V, E>> {
        self.caches.get(name)
    }

    pub fn get_cache_mut(&mut self, name: &str) -> Option<&mut Cache<K, V, E>> {
        self.caches.get_mut(name)
    }

    // == Get ==
    /// Forwards to the named cache. An unregistered name is a miss, not an
    /// error.
    pub fn get(&mut self, cache_name: &str, key: &K) -> Option<&V> {
        match self.caches.get_mut(cache_name) {
            Some(cache) => cache.get(key),
            None => {
                trace!(cache = %cache_name, "get on unregistered cache");
                None
            }
        }
    }

    // == Put ==
    /// Forwards to the named cache; does nothing if the name is
    /// unregistered.
    pub fn put(&mut self, cache_name: &str, key: K, value: V, ttl: Option<Duration>) {
        match self.caches.get_mut(cache_name) {
            Some(cache) => cache.put(key, value, ttl),
            None => trace!(cache = %cache_name, "put on unregistered cache dropped"),
        }
    }

    // == Remove ==
    /// Forwards to the named cache; returns whether anything was removed.
    pub fn remove(&mut self, cache_name: &str, key: &K) -> bool {
        self.caches
            .get_mut(cache_name)
            .map_or(false, |cache| cache.remove(key))
    }

    // == Clear ==
    /// Clears one named cache, if registered.
    pub fn clear_cache(&mut self, name: &str) {
        if let Some(cache) = self.caches.get_mut(name) {
            cache.clear();
        }
    }

    /// Clears every registered cache; the registry itself survives.
    pub fn clear_all(&mut self) {
        for cache in self.caches.values_mut() {
            cache.clear();
        }
        info!("all caches cleared");
    }

    // == Shutdown ==
    /// Clears every cache and drops the registry.
    pub fn shutdown(&mut self) {
        self.clear_all();
        self.caches.clear();
        info!("cache manager shut down");
    }

    // == Memory ==
    /// Total estimated bytes across every registered cache.
    pub fn total_memory(&self) -> usize {
        self.caches.values().map(Cache::total_memory).sum()
    }

    pub fn cache_count(&self) -> usize {
        self.caches.len()
    }

    // == Update ==
    /// Per-tick maintenance hook; call exactly once per tick.
    ///
    /// A no-op until `sweep_interval` has elapsed since the last sweep.
    /// The sweep removes expired entries from every cache, then checks the
    /// aggregate footprint against the process-wide ceiling and
    /// force-reclaims if it is still above.
    pub fn update(&mut self) {
        if self.last_sweep.elapsed() < self.sweep_interval {
            return;
        }
        self.last_sweep = Instant::now();
        self.sweep();
    }

    /// One full maintenance pass, independent of the interval gate.
    fn sweep(&mut self) {
        let mut swept = 0;
        for cache in self.caches.values_mut() {
            swept += cache.evict_expired();
        }

        let total = self.total_memory();
        debug!(swept, total_memory = total, "sweep complete");

        if total > self.memory_ceiling {
            self.reclaim_to_ceiling();
        }
    }

    /// Forced reclamation when the aggregate footprint exceeds the
    /// process-wide ceiling: repeatedly evicts one entry from whichever
    /// cache currently holds the most memory, until under the ceiling or
    /// every cache is empty.
    fn reclaim_to_ceiling(&mut self) {
        let before = self.total_memory();

        while self.total_memory() > self.memory_ceiling {
            let largest = self
                .caches
                .iter()
                .filter(|(_, cache)| !cache.is_empty())
                .max_by_key(|(_, cache)| cache.total_memory())
                .map(|(name, _)| name.clone());

            let evicted = match largest {
                Some(name) => self
                    .caches
                    .get_mut(&name)
                    .map_or(false, |cache| cache.evict_one()),
                None => false,
            };
            if !evicted {
                break;
            }
        }

        info!(
            reclaimed = before.saturating_sub(self.total_memory()),
            ceiling = self.memory_ceiling,
            "forced reclamation ran"
        );
    }

    // == Report ==
    /// Aggregate snapshot across every registered cache. Read-only.
    pub fn report(&self) -> ManagerReport {
        let caches: BTreeMap<String, CacheReport> = self
            .caches
            .iter()
            .map(|(name, cache)| (name.clone(), cache.report()))
            .collect();

        ManagerReport {
            generated_at: Utc::now(),
            total_memory_bytes: self.total_memory(),
            cache_count: self.caches.len(),
            caches,
        }
    }
}

impl<K, V> CacheManager<K, V, FallbackEstimator>
where
    K: Eq + Hash + Clone,
{
    /// Manager with the flat fallback estimator and default maintenance
    /// parameters.
    pub fn new() -> Self {
        Self::with_estimator(
            FallbackEstimator,
            DEFAULT_SWEEP_INTERVAL,
            DEFAULT_MEMORY_CEILING,
        )
    }
}

impl<K, V> Default for CacheManager<K, V, FallbackEstimator>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{EvictionPolicy, FnEstimator};
    use std::thread::sleep;

    fn manager() -> CacheManager<&'static str, u32> {
        CacheManager::new()
    }

    #[test]
    fn test_create_and_forward() {
        let mut mgr = manager();
        mgr.create_cache(CacheConfig::new("tiles")).unwrap();

        mgr.put("tiles", "k", 7, None);
        assert_eq!(mgr.get("tiles", &"k"), Some(&7));
        assert_eq!(mgr.cache_count(), 1);
    }

    #[test]
    fn test_unregistered_cache_is_silent() {
        let mut mgr = manager();

        // None of these are errors.
        mgr.put("ghost", "k", 1, None);
        assert_eq!(mgr.get("ghost", &"k"), None);
        assert!(!mgr.remove("ghost", &"k"));
        mgr.clear_cache("ghost");
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut mgr = manager();
        let result = mgr.create_cache(CacheConfig::new("bad").max_entries(0));
        assert!(result.is_err());
        assert!(mgr.get_cache("bad").is_none());
    }

    #[test]
    fn test_replacing_cache_discards_entries() {
        let mut mgr = manager();

        mgr.create_cache(CacheConfig::new("tiles")).unwrap();
        mgr.put("tiles", "k", 1, None);

        mgr.create_cache(CacheConfig::new("tiles").policy(EvictionPolicy::Fifo))
            .unwrap();

        assert_eq!(mgr.get("tiles", &"k"), None);
        assert_eq!(mgr.get_cache("tiles").unwrap().policy(), EvictionPolicy::Fifo);
    }

    #[test]
    fn test_total_memory_sums_caches() {
        let mut mgr: CacheManager<&str, Vec<u8>, _> = CacheManager::with_estimator(
            FnEstimator(|v: &Vec<u8>| v.len()),
            DEFAULT_SWEEP_INTERVAL,
            DEFAULT_MEMORY_CEILING,
        );
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.create_cache(CacheConfig::new("b")).unwrap();

        mgr.put("a", "k1", vec![0; 100], None);
        mgr.put("b", "k2", vec![0; 50], None);

        assert_eq!(mgr.total_memory(), 150);
        assert_eq!(
            mgr.total_memory(),
            mgr.get_cache("a").unwrap().total_memory()
                + mgr.get_cache("b").unwrap().total_memory()
        );
    }

    #[test]
    fn test_clear_all() {
        let mut mgr = manager();
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.create_cache(CacheConfig::new("b")).unwrap();
        mgr.put("a", "k", 1, None);
        mgr.put("b", "k", 2, None);

        mgr.clear_all();

        assert_eq!(mgr.total_memory(), 0);
        assert_eq!(mgr.cache_count(), 2);
        assert_eq!(mgr.get("a", &"k"), None);
    }

    #[test]
    fn test_shutdown_drops_registry() {
        let mut mgr = manager();
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.put("a", "k", 1, None);

        mgr.shutdown();

        assert_eq!(mgr.cache_count(), 0);
        assert_eq!(mgr.get("a", &"k"), None);
    }

    #[test]
    fn test_update_respects_sweep_interval() {
        let mut mgr: CacheManager<&str, u32> = CacheManager::with_estimator(
            FallbackEstimator,
            Duration::from_secs(3600),
            DEFAULT_MEMORY_CEILING,
        );
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.put("a", "k", 1, Some(Duration::from_millis(5)));
        sleep(Duration::from_millis(10));

        // Interval has not elapsed, so the expired entry is untouched.
        mgr.update();
        assert_eq!(mgr.get_cache("a").unwrap().len(), 1);
    }

    #[test]
    fn test_sweep_removes_expired_across_caches() {
        let mut mgr: CacheManager<&str, u32> = CacheManager::with_estimator(
            FallbackEstimator,
            Duration::ZERO,
            DEFAULT_MEMORY_CEILING,
        );
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.create_cache(CacheConfig::new("b")).unwrap();
        mgr.put("a", "k", 1, Some(Duration::from_millis(5)));
        mgr.put("b", "k", 2, Some(Duration::from_millis(5)));
        mgr.put("b", "keep", 3, None);
        sleep(Duration::from_millis(10));

        mgr.update();

        assert_eq!(mgr.get_cache("a").unwrap().len(), 0);
        assert_eq!(mgr.get_cache("b").unwrap().len(), 1);
    }

    #[test]
    fn test_ceiling_reclamation() {
        let mut mgr: CacheManager<&str, Vec<u8>, _> = CacheManager::with_estimator(
            FnEstimator(|v: &Vec<u8>| v.len()),
            Duration::ZERO,
            // Process-wide ceiling below what the caches are allowed
            // individually.
            250,
        );
        mgr.create_cache(CacheConfig::new("big")).unwrap();
        mgr.create_cache(CacheConfig::new("small")).unwrap();

        mgr.put("big", "k1", vec![0; 200], None);
        mgr.put("big", "k2", vec![0; 200], None);
        mgr.put("small", "k3", vec![0; 10], None);

        mgr.update();

        assert!(mgr.total_memory() <= 250);
        // The small cache was never the largest, so it is untouched.
        assert_eq!(mgr.get_cache("small").unwrap().len(), 1);
    }

    #[test]
    fn test_report_aggregates() {
        let mut mgr = manager();
        mgr.create_cache(CacheConfig::new("a")).unwrap();
        mgr.create_cache(CacheConfig::new("b")).unwrap();
        mgr.put("a", "k", 1, None);
        mgr.get("a", &"k");

        let report = mgr.report();
        assert_eq!(report.cache_count, 2);
        assert_eq!(report.total_memory_bytes, mgr.total_memory());
        assert_eq!(report.caches["a"].hits, 1);
        assert_eq!(report.caches["b"].entries, 0);
    }
}
