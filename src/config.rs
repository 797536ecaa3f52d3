//! Configuration Module
//!
//! Loads manager-level tuning from environment variables with sensible
//! defaults. Per-cache limits are configured in code via `CacheConfig` by
//! the subsystem that owns each cache.

use std::env;
use std::time::Duration;

/// Manager tuning parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between periodic expiry sweeps
    pub sweep_interval_secs: u64,
    /// Process-wide memory ceiling across all caches, in megabytes
    pub memory_ceiling_mb: usize,
    /// Number of ticks the demo loop runs
    pub demo_ticks: u64,
}

impl Config {
    /// Creates a Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL` - Seconds between expiry sweeps (default: 60)
    /// - `MEMORY_CEILING_MB` - Process-wide ceiling in MB (default: 200)
    /// - `DEMO_TICKS` - Demo loop length in ticks (default: 600)
    pub fn from_env() -> Self {
        Self {
            sweep_interval_secs: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
            memory_ceiling_mb: env::var("MEMORY_CEILING_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            demo_ticks: env::var("DEMO_TICKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn memory_ceiling_bytes(&self) -> usize {
        self.memory_ceiling_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sweep_interval_secs: 60,
            memory_ceiling_mb: 200,
            demo_ticks: 600,
        }
    }
}
