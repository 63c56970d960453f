//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The size estimator could not compute a footprint for a value
    #[error("Size estimation failed: {0}")]
    SizeEstimation(String),

    /// Value is larger than 90% of the configured maximum size
    #[error("Value of {size} bytes exceeds the per-entry limit of {limit} bytes")]
    Oversized { size: usize, limit: usize },

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
