//! Senko Cache demo
//!
//! Drives a memoized async lookup from many concurrent callers and reports
//! the cache statistics.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use senko_cache::memo::AsyncCachedFunction;
use senko_cache::{Cache, Config, SharedCache, TtlCache};

const NAMES: [&str; 3] = ["Maxee", "Senko", "Shiro"];

/// Entry point for the demo.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create a shared TTL cache with the configured parameters
/// 4. Wrap a slow async lookup with a locked memoizing wrapper
/// 5. Spawn concurrent callers and collect their results
/// 6. Log the final cache statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "senko_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, ttl={}ms, callers={}",
        config.capacity, config.ttl_ms, config.concurrent_callers
    );

    let cache = SharedCache::new(TtlCache::new(config.capacity, config.ttl())?);
    let greet = AsyncCachedFunction::new(cache.clone(), |(name,): (String,)| async move {
        info!(%name, "computing greeting");
        tokio::time::sleep(Duration::from_millis(25)).await;
        format!("You're cool, {name}!")
    })
    .with_lock(Arc::new(tokio::sync::Mutex::new(())));
    let greet = Arc::new(greet);

    let handles: Vec<_> = (0..config.concurrent_callers)
        .map(|i| {
            let greet = Arc::clone(&greet);
            let name = NAMES[i % NAMES.len()].to_string();
            tokio::spawn(async move { greet.call((name,)).await })
        })
        .collect();

    for handle in handles {
        let greeting = handle.await?;
        info!(%greeting, "caller finished");
    }

    let (stats, summary) = cache.with(|c| (c.stats(), c.to_string()));
    info!("{} stats: {}", summary, serde_json::to_string(&stats)?);

    Ok(())
}
