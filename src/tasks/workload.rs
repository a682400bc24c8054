//! Workload Task
//!
//! Worker tasks that replay a read-through access pattern against a cache
//! shared behind a `tokio::sync::Mutex`. The cache has no locking of its own,
//! so every operation runs with the lock held.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Cache shared between worker tasks.
pub type SharedCache = Arc<Mutex<Cache<Vec<u8>>>>;

/// Yield to the scheduler after this many operations.
const YIELD_EVERY: usize = 64;

// == Worker Report ==
/// What a single worker observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub worker: usize,
    /// Lookups issued
    pub reads: u64,
    /// Lookups that found the key
    pub hits: u64,
    /// Values written after a miss
    pub writes: u64,
}

/// Picks the key for operation `op` of `worker`.
///
/// Two thirds of the traffic goes to a hot set of one eighth of the key space;
/// the rest strides over the whole space.
fn key_for(worker: usize, op: usize, key_space: usize) -> String {
    let hot = (key_space / 8).max(1);
    let idx = if op % 3 != 0 {
        (op * 7 + worker) % hot
    } else {
        (op * 31 + worker * 17) % key_space
    };
    format!("key:{idx:06}")
}

/// Spawns one worker performing `config.ops_per_worker` read-through operations.
///
/// # Returns
/// A JoinHandle resolving to the worker's report. Abort it to stop early.
pub fn spawn_worker(cache: SharedCache, worker: usize, config: &Config) -> JoinHandle<WorkerReport> {
    let ops = config.ops_per_worker;
    let key_space = config.key_space;
    let value_size = config.value_size;

    tokio::spawn(async move {
        debug!(worker, ops, "Worker started");
        let mut report = WorkerReport {
            worker,
            ..WorkerReport::default()
        };

        for op in 0..ops {
            let key = key_for(worker, op, key_space);
            {
                let mut guard = cache.lock().await;
                report.reads += 1;
                if guard.get(&key).is_some() {
                    report.hits += 1;
                } else {
                    guard.add(key, vec![worker as u8; value_size]);
                    report.writes += 1;
                }
            }

            if (op + 1) % YIELD_EVERY == 0 {
                tokio::task::yield_now().await;
            }
        }

        debug!(worker, hits = report.hits, reads = report.reads, "Worker finished");
        report
    })
}

/// Spawns `config.workers` workers against the same cache.
pub fn spawn_workers(cache: &SharedCache, config: &Config) -> Vec<JoinHandle<WorkerReport>> {
    info!(
        "Spawning {} workers, {} operations each",
        config.workers, config.ops_per_worker
    );
    (0..config.workers)
        .map(|worker| spawn_worker(Arc::clone(cache), worker, config))
        .collect()
}

/// Waits for every worker and collects their reports in spawn order.
pub async fn join_workers(handles: Vec<JoinHandle<WorkerReport>>) -> Result<Vec<WorkerReport>> {
    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle
            .await
            .map_err(|e| CacheError::WorkerFailed(e.to_string()))?;
        reports.push(report);
    }
    Ok(reports)
}
