//! Cache Module
//!
//! Provides a byte-budgeted in-memory cache with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;
mod value;


// Re-export public types
pub use entry::{entry_size, saturate_bytes, CacheEntry};
pub use lru::{Handle, Iter, RecencyList};
pub use stats::CacheStats;
pub use store::{Cache, CacheBuilder, EvictionCallback};
pub use value::Value;
