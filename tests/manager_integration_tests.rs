//! Integration Tests for the Cache Manager
//!
//! Exercises the public API the way a host application does: one manager
//! at the composition root, several named caches with different policies,
//! per-tick update calls, and teardown.

use std::time::Duration;

use tick_cache::cache::{raster_cost, CostEstimator, DEFAULT_MEMORY_CEILING};
use tick_cache::{CacheConfig, CacheManager, EstimateCost, EvictionPolicy};

// == Helper Types ==

#[derive(Debug, Clone, PartialEq)]
enum Artifact {
    Frame { width: usize, height: usize },
    Samples(Vec<f32>),
}

impl EstimateCost for Artifact {
    fn estimated_cost(&self) -> usize {
        match self {
            Artifact::Frame { width, height } => raster_cost(*width, *height, 4),
            Artifact::Samples(samples) => samples.estimated_cost(),
        }
    }
}

fn build_manager(
    sweep_interval: Duration,
    memory_ceiling: usize,
) -> CacheManager<String, Artifact, CostEstimator> {
    let mut manager = CacheManager::with_estimator(CostEstimator, sweep_interval, memory_ceiling);
    manager
        .create_cache(
            CacheConfig::new("frames")
                .max_entries(16)
                .max_memory(64 * 1024)
                .policy(EvictionPolicy::Lru),
        )
        .unwrap();
    manager
        .create_cache(
            CacheConfig::new("sounds")
                .max_entries(8)
                .max_memory(256 * 1024)
                .policy(EvictionPolicy::Lfu),
        )
        .unwrap();
    manager
        .create_cache(
            CacheConfig::new("groupings")
                .max_entries(4)
                .max_memory(16 * 1024)
                .policy(EvictionPolicy::Ttl)
                .default_ttl(Duration::from_millis(20)),
        )
        .unwrap();
    manager
}

// == Scenario Tests ==

#[test]
fn test_miss_then_hit_round_trip() {
    let mut manager = build_manager(Duration::from_secs(60), DEFAULT_MEMORY_CEILING);
    let frame = Artifact::Frame {
        width: 32,
        height: 32,
    };

    assert_eq!(manager.get("frames", &"tile_0".to_string()), None);
    manager.put("frames", "tile_0".to_string(), frame.clone(), None);
    assert_eq!(manager.get("frames", &"tile_0".to_string()), Some(&frame));

    let report = manager.report();
    assert_eq!(report.caches["frames"].hits, 1);
    assert_eq!(report.caches["frames"].misses, 1);
    assert_eq!(report.caches["frames"].hit_rate, 0.5);
}

#[test]
fn test_sized_values_are_charged_by_estimator() {
    let mut manager = build_manager(Duration::from_secs(60), DEFAULT_MEMORY_CEILING);

    manager.put(
        "frames",
        "tile_0".to_string(),
        Artifact::Frame {
            width: 32,
            height: 32,
        },
        None,
    );
    manager.put(
        "sounds",
        "step".to_string(),
        Artifact::Samples(vec![0.0; 1000]),
        None,
    );

    // 32*32*4 raster bytes plus 1000 f32 samples.
    assert_eq!(manager.total_memory(), 4096 + 4000);
}

#[test]
fn test_ttl_cache_expires_between_ticks() {
    let mut manager = build_manager(Duration::from_secs(60), DEFAULT_MEMORY_CEILING);
    let key = "active".to_string();

    manager.put(
        "groupings",
        key.clone(),
        Artifact::Frame {
            width: 8,
            height: 8,
        },
        None,
    );
    assert!(manager.get("groupings", &key).is_some());

    std::thread::sleep(Duration::from_millis(30));

    // The default TTL of 20ms has elapsed; the entry is gone lazily.
    assert_eq!(manager.get("groupings", &key), None);
    assert_eq!(manager.get_cache("groupings").unwrap().len(), 0);
}

#[test]
fn test_update_sweeps_without_reads() {
    let mut manager = build_manager(Duration::ZERO, DEFAULT_MEMORY_CEILING);

    manager.put(
        "groupings",
        "stale".to_string(),
        Artifact::Frame {
            width: 8,
            height: 8,
        },
        None,
    );
    std::thread::sleep(Duration::from_millis(30));

    // Nothing reads the entry; the periodic sweep alone reclaims it.
    manager.update();
    assert_eq!(manager.get_cache("groupings").unwrap().len(), 0);
    assert_eq!(manager.total_memory(), 0);
}

#[test]
fn test_process_ceiling_forces_reclamation() {
    // Ceiling far below the individual cache limits.
    let mut manager = build_manager(Duration::ZERO, 10 * 1024);

    for i in 0..8 {
        manager.put(
            "frames",
            format!("tile_{i}"),
            Artifact::Frame {
                width: 32,
                height: 32,
            },
            None,
        );
    }
    assert!(manager.total_memory() > 10 * 1024);

    manager.update();
    assert!(manager.total_memory() <= 10 * 1024);
}

#[test]
fn test_many_ticks_stay_within_bounds() {
    let mut manager = build_manager(Duration::from_millis(10), DEFAULT_MEMORY_CEILING);

    for tick in 0..500u64 {
        // Skewed access: a hot set of 8 tiles plus a cold tail, the way
        // a scrolling view revisits what is on screen.
        let key = if tick % 5 == 0 {
            format!("tile_{}", 8 + tick % 16)
        } else {
            format!("tile_{}", tick % 8)
        };
        if manager.get("frames", &key).is_none() {
            manager.put(
                "frames",
                key,
                Artifact::Frame {
                    width: 32,
                    height: 32,
                },
                None,
            );
        }
        manager.update();

        assert!(manager.get_cache("frames").unwrap().len() <= 16);
        assert!(manager.get_cache("frames").unwrap().total_memory() <= 64 * 1024);
    }

    let report = manager.report();
    // 24 distinct tiles sharing 16 slots: plenty of both hits and
    // misses.
    assert!(report.caches["frames"].hits > 0);
    assert!(report.caches["frames"].misses > 0);
    assert!(report.caches["frames"].evictions > 0);
}

#[test]
fn test_clear_all_and_shutdown() {
    let mut manager = build_manager(Duration::from_secs(60), DEFAULT_MEMORY_CEILING);

    manager.put(
        "frames",
        "tile_0".to_string(),
        Artifact::Frame {
            width: 32,
            height: 32,
        },
        None,
    );

    manager.clear_all();
    assert_eq!(manager.total_memory(), 0);
    assert_eq!(manager.cache_count(), 3);

    manager.shutdown();
    assert_eq!(manager.cache_count(), 0);
}

#[test]
fn test_report_serializes_to_json() {
    let mut manager = build_manager(Duration::from_secs(60), DEFAULT_MEMORY_CEILING);
    manager.put(
        "frames",
        "tile_0".to_string(),
        Artifact::Frame {
            width: 32,
            height: 32,
        },
        None,
    );

    let json = serde_json::to_value(manager.report()).unwrap();
    assert_eq!(json["cache_count"], 3);
    assert_eq!(json["caches"]["frames"]["policy"], "lru");
    assert_eq!(json["caches"]["frames"]["memory_bytes"], 4096);
    assert!(json["generated_at"].is_string());
}
