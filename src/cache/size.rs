//! Size Estimation Module
//!
//! The cache budgets by estimated bytes. It asks a [`SizeEstimator`] for the
//! footprint of each value once, at insertion time.

use deepsize::DeepSizeOf;
use serde::Serialize;

use crate::error::{CacheError, Result};

// == Size Estimator ==
/// Computes the approximate footprint of a value in bytes.
///
/// Failures are not fatal: the cache logs them and charges a default size.
pub trait SizeEstimator<V>: Send + Sync {
    fn estimate(&self, value: &V) -> Result<usize>;
}

// == Stock Estimators ==
/// Estimates with [`DeepSizeOf`], counting owned heap data. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepSizeEstimator;

impl<V: DeepSizeOf> SizeEstimator<V> for DeepSizeEstimator {
    fn estimate(&self, value: &V) -> Result<usize> {
        Ok(value.deep_size_of())
    }
}

/// Estimates as the length of the value's JSON encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSizeEstimator;

impl<V: Serialize> SizeEstimator<V> for JsonSizeEstimator {
    fn estimate(&self, value: &V) -> Result<usize> {
        serde_json::to_vec(value)
            .map(|bytes| bytes.len())
            .map_err(|e| CacheError::SizeEstimation(e.to_string()))
    }
}

/// Adapts a closure into a [`SizeEstimator`].
#[derive(Debug, Clone, Copy)]
pub struct EstimateWith<F>(pub F);

impl<V, F> SizeEstimator<V> for EstimateWith<F>
where
    F: Fn(&V) -> Result<usize> + Send + Sync,
{
    fn estimate(&self, value: &V) -> Result<usize> {
        (self.0)(value)
    }
}
