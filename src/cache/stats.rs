//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! expirations.

use serde::Serialize;

// == Counters ==
/// Live counters owned by the store. Only `get` touches hits and misses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Counters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl Counters {
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

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Cache display name
    pub name: String,
    /// Number of entries present
    pub entries: usize,
    /// Sum of estimated entry sizes in bytes
    pub size_bytes: usize,
    /// Configured byte limit, None = unlimited
    pub max_size: Option<usize>,
    /// Configured lifetime in milliseconds, None = never expires
    pub max_lifetime_ms: Option<u64>,
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups (absent or expired)
    pub misses: u64,
    /// Entries removed by size-based culling
    pub evictions: u64,
    /// Entries removed by TTL sweeps
    pub expirations: u64,
    /// RFC 3339 capture time
    pub captured_at: String,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
