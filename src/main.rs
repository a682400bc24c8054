//! Mini LRU - workload driver
//!
//! Shares one byte-budgeted cache between several worker tasks, runs a
//! read-through workload against it, and prints the final statistics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{info, trace, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_lru::tasks::{join_workers, spawn_workers, SharedCache};
use mini_lru::Config;

/// Main entry point for the workload driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared cache with an eviction counter
/// 4. Spawn workers and wait for them, or abort them on SIGINT/SIGTERM
/// 5. Print final statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mini LRU workload driver");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: max_bytes={}, workers={}, ops_per_worker={}, key_space={}, value_size={}",
        config.max_bytes, config.workers, config.ops_per_worker, config.key_space, config.value_size
    );

    let evicted = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&evicted);
    let cache = config
        .cache_builder()
        .on_evicted(move |key, value: Vec<u8>| {
            counter.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, bytes = value.len(), "Eviction observed");
        })
        .build();
    let cache: SharedCache = Arc::new(Mutex::new(cache));

    let handles = spawn_workers(&cache, &config);
    let aborts: Vec<_> = handles.iter().map(|h| h.abort_handle()).collect();

    let reports = tokio::select! {
        reports = join_workers(handles) => Some(reports.context("workload failed")?),
        _ = shutdown_signal() => {
            for abort in &aborts {
                abort.abort();
            }
            warn!("Workers aborted before completion");
            None
        }
    };

    let stats = cache.lock().await.stats();
    info!(
        "Workload finished: hit_rate={:.3}, evictions={}, entries={}, used_bytes={}",
        stats.hit_rate(),
        stats.evictions,
        stats.total_entries,
        stats.used_bytes
    );

    let summary = json!({
        "config": config,
        "completed": reports.is_some(),
        "workers": reports.unwrap_or_default(),
        "stats": stats,
        "hit_rate": stats.hit_rate(),
        "evictions_observed": evicted.load(Ordering::Relaxed),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping workers...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping workers...");
        }
    }
}
