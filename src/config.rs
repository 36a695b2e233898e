//! Configuration module for HostPulse.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::store::FavoritesStore;

use std::env;
use std::path::PathBuf;

/// Default seconds between probes for a host.
pub const DEFAULT_PING_INTERVAL_SECS: f64 = 2.0;
/// Default milliseconds a probe waits for an echo reply.
pub const DEFAULT_PING_TIMEOUT_MS: u64 = 1000;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Seconds between probes (default: 2.0)
    pub ping_interval_secs: f64,
    /// Per-probe timeout in milliseconds (default: 1000)
    pub ping_timeout_ms: u64,
    /// Path to the favorites file (default: platform data directory)
    pub favorites_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ping_interval_secs: DEFAULT_PING_INTERVAL_SECS,
            ping_timeout_ms: DEFAULT_PING_TIMEOUT_MS,
            favorites_path: FavoritesStore::default_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HOSTPULSE_PING_INTERVAL_SECS`: seconds between probes (default: 2.0)
    /// - `HOSTPULSE_PING_TIMEOUT_MS`: probe timeout in ms (default: 1000)
    /// - `HOSTPULSE_FAVORITES_PATH`: favorites file path
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(interval_str) = env::var("HOSTPULSE_PING_INTERVAL_SECS") {
            if let Ok(interval) = interval_str.parse::<f64>() {
                if interval > 0.0 {
                    cfg.ping_interval_secs = interval;
                }
            }
        }

        if let Ok(timeout_str) = env::var("HOSTPULSE_PING_TIMEOUT_MS") {
            if let Ok(timeout) = timeout_str.parse::<u64>() {
                if timeout > 0 {
                    cfg.ping_timeout_ms = timeout;
                }
            }
        }

        if let Ok(path) = env::var("HOSTPULSE_FAVORITES_PATH") {
            cfg.favorites_path = PathBuf::from(path);
        }

        cfg
    }
}
