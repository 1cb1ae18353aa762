//! Configuration Module
//!
//! Handles loading server and admin-layer settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::admin::AdminSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for writes without explicit TTL (0 = no expiry)
    pub default_ttl: u64,
    /// Background expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Work hint passed to each cursor scan step
    pub scan_page_size: usize,
    /// Upper bound on a flush, in seconds
    pub flush_timeout: u64,
    /// Maximum deletes in flight during a bulk delete
    pub purge_concurrency: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds, 0 disables (default: 0)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `SCAN_PAGE_SIZE` - Keys examined per scan step (default: 250)
    /// - `FLUSH_TIMEOUT` - Flush deadline in seconds (default: 30)
    /// - `PURGE_CONCURRENCY` - Parallel deletes per bulk delete (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            scan_page_size: env_or("SCAN_PAGE_SIZE", defaults.scan_page_size),
            flush_timeout: env_or("FLUSH_TIMEOUT", defaults.flush_timeout),
            purge_concurrency: env_or("PURGE_CONCURRENCY", defaults.purge_concurrency),
        }
    }

    /// Default TTL for the in-memory store, None when disabled.
    pub fn default_ttl(&self) -> Option<u64> {
        (self.default_ttl > 0).then_some(self.default_ttl)
    }

    /// Settings for [`ServerUtil`](crate::admin::ServerUtil).
    pub fn admin_settings(&self) -> AdminSettings {
        AdminSettings::new(
            self.scan_page_size,
            Duration::from_secs(self.flush_timeout),
            self.purge_concurrency,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: 0,
            sweep_interval: 1,
            scan_page_size: 250,
            flush_timeout: 30,
            purge_concurrency: 1,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
