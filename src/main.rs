//! Sized Cache - demo driver
//!
//! Fills a cache configured from the environment with a synthetic workload
//! and prints the resulting statistics as JSON.

use std::env;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sized_cache::{Cache, CacheConfig};

/// Number of synthetic entries written when `WORKLOAD_ENTRIES` is unset
const DEFAULT_WORKLOAD_ENTRIES: usize = 200;

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Write a synthetic workload, reading every third key back
/// 4. Print statistics as JSON on stdout
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sized_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    config.validate().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: name={}, max_size={:?}, max_lifetime={:?}",
        config.name, config.max_size, config.max_lifetime
    );

    let entries = env::var("WORKLOAD_ENTRIES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_WORKLOAD_ENTRIES);

    let cache: Cache<String, String> = Cache::new(config);
    for i in 0..entries {
        let value = "x".repeat(16 * (1 + i % 8));
        if cache.put(format!("key-{}", i), value).is_rejected() {
            continue;
        }
        if i % 3 == 0 {
            cache.get(&format!("key-{}", i / 2));
        }
    }

    info!("Workload complete: {} entries live", cache.len());

    let stats = cache.stats();
    let json = serde_json::to_string_pretty(&stats).context("failed to encode statistics")?;
    println!("{}", json);
    println!("hit_rate={:.3}", stats.hit_rate());

    Ok(())
}
