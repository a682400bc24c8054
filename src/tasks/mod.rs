//! Background Tasks Module
//!
//! Worker tasks that drive a shared cache with a synthetic request workload.
//!
//! # Tasks
//! - Workload: read-through get/add traffic against one locked cache

mod workload;

pub use workload::{join_workers, spawn_worker, spawn_workers, SharedCache, WorkerReport};
