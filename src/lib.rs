//! Mini LRU - A byte-budgeted in-memory cache
//!
//! Provides a key-value cache that evicts least-recently-used entries once the
//! summed size of keys and values exceeds a byte budget.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheBuilder, CacheStats, Value};
pub use config::Config;
pub use error::{CacheError, Result};
