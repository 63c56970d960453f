//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Display name, used only in diagnostics
    pub name: String,
    /// Maximum estimated size in bytes, None = unlimited
    pub max_size: Option<usize>,
    /// Maximum time an entry may live after insertion, None = never expires
    pub max_lifetime: Option<Duration>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAME` - Cache name (default: "default")
    /// - `MAX_CACHE_SIZE` - Maximum size in bytes (default: unlimited, `-1` or `0` = unlimited)
    /// - `MAX_LIFETIME_MS` - Entry lifetime in milliseconds (default: disabled, `-1` or `0` = disabled)
    pub fn from_env() -> Self {
        let name = env::var("CACHE_NAME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "default".to_string());

        let max_size = env::var("MAX_CACHE_SIZE")
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| v as usize);

        let max_lifetime = env::var("MAX_LIFETIME_MS")
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .map(|v| Duration::from_millis(v as u64));

        Self {
            name,
            max_size,
            max_lifetime,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the maximum size in bytes.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets the maximum lifetime. A zero duration disables expiration.
    pub fn with_max_lifetime(mut self, max_lifetime: Duration) -> Self {
        self.max_lifetime = normalize_lifetime(Some(max_lifetime));
        self
    }

    /// Checks that the configuration can be used to build a cache.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "cache name must not be empty".to_string(),
            ));
        }
        if self.max_size == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive; use None for unlimited".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            max_size: None,
            max_lifetime: None,
        }
    }
}

/// Maps a zero lifetime to "expiration disabled".
pub(crate) fn normalize_lifetime(lifetime: Option<Duration>) -> Option<Duration> {
    lifetime.filter(|d| !d.is_zero())
}
