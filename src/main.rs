//! Tick Cache demo binary
//!
//! Simulates the host loop of an interactive application: builds one
//! manager at the composition root, registers the default caches, runs a
//! tick loop issuing cache traffic, and prints the aggregate telemetry
//! report at the end.

use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tick_cache::cache::{raster_cost, CostEstimator};
use tick_cache::{CacheConfig, CacheManager, Config, EstimateCost, EvictionPolicy};

const MB: usize = 1024 * 1024;

// == Demo Value Type ==
/// Cached artifacts the demo loop produces. A real deployment models its
/// heterogeneous values the same way.
#[derive(Debug, Clone)]
enum Asset {
    /// Composited RGBA frame
    Frame { width: usize, height: usize },
    /// Spatial grouping of sprites
    SpriteGroup { sprites: usize },
    /// Decoded audio samples
    Samples(Vec<f32>),
    /// Parsed level data
    Level(String),
}

impl EstimateCost for Asset {
    fn estimated_cost(&self) -> usize {
        match self {
            Asset::Frame { width, height } => raster_cost(*width, *height, 4),
            Asset::SpriteGroup { sprites } => sprites * 64,
            Asset::Samples(samples) => samples.estimated_cost(),
            Asset::Level(data) => data.estimated_cost(),
        }
    }
}

type Manager = CacheManager<String, Asset, CostEstimator>;

/// Registers the default caches with their policies and limits.
fn create_default_caches(manager: &mut Manager) -> Result<()> {
    manager.create_cache(
        CacheConfig::new("tile_surfaces")
            .max_entries(200)
            .max_memory(50 * MB)
            .policy(EvictionPolicy::Lru),
    )?;
    manager.create_cache(
        CacheConfig::new("animation_frames")
            .max_entries(100)
            .max_memory(30 * MB)
            .policy(EvictionPolicy::Lfu),
    )?;
    manager.create_cache(
        CacheConfig::new("collision_groups")
            .max_entries(10)
            .max_memory(10 * MB)
            .policy(EvictionPolicy::Lru)
            .default_ttl(Duration::from_secs(5)),
    )?;
    manager.create_cache(
        CacheConfig::new("level_data")
            .max_entries(5)
            .max_memory(20 * MB)
            .policy(EvictionPolicy::Lru),
    )?;
    manager.create_cache(
        CacheConfig::new("sounds")
            .max_entries(50)
            .max_memory(20 * MB)
            .policy(EvictionPolicy::Lfu),
    )?;
    Ok(())
}

/// One tick's worth of cache traffic: look up the artifacts the frame
/// needs, recompute and store the ones that missed.
fn run_tick(manager: &mut Manager, tick: u64) {
    // Tiles visible this tick; neighbouring ticks revisit most of them.
    for offset in 0..8u64 {
        let key = format!("tile_{}", (tick / 4 + offset) % 64);
        if manager.get("tile_surfaces", &key).is_none() {
            manager.put(
                "tile_surfaces",
                key,
                Asset::Frame {
                    width: 32,
                    height: 32,
                },
                None,
            );
        }
    }

    // A handful of animation frames, heavily skewed toward a few cycles.
    let anim_key = format!("walk_{}", tick % 6);
    if manager.get("animation_frames", &anim_key).is_none() {
        manager.put(
            "animation_frames",
            anim_key,
            Asset::Frame {
                width: 64,
                height: 64,
            },
            None,
        );
    }

    // Collision groups rebuilt whenever their TTL lapses.
    if manager.get("collision_groups", &"active".to_string()).is_none() {
        manager.put(
            "collision_groups",
            "active".to_string(),
            Asset::SpriteGroup { sprites: 120 },
            None,
        );
    }

    // Occasional level and sound loads.
    if tick % 120 == 0 {
        let level_key = format!("level_{}", tick / 120);
        manager.put(
            "level_data",
            level_key,
            Asset::Level("x".repeat(4096)),
            None,
        );
        manager.put(
            "sounds",
            format!("step_{}", tick / 120 % 4),
            Asset::Samples(vec![0.0; 11_025]),
            None,
        );
    }

    manager.update();
}

fn main() -> Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tick_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tick-cache demo");

    let config = Config::from_env();
    info!(
        "Configuration loaded: sweep_interval={}s, memory_ceiling={}MB, ticks={}",
        config.sweep_interval_secs, config.memory_ceiling_mb, config.demo_ticks
    );

    let mut manager: Manager = CacheManager::with_estimator(
        CostEstimator,
        config.sweep_interval(),
        config.memory_ceiling_bytes(),
    );
    create_default_caches(&mut manager)?;
    info!("Default caches registered");

    for tick in 0..config.demo_ticks {
        run_tick(&mut manager, tick);
    }

    let report = manager.report();
    println!("{}", serde_json::to_string_pretty(&report)?);

    manager.shutdown();
    info!("Demo complete");
    Ok(())
}
