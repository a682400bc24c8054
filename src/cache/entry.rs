//! Cache Entry Module
//!
//! Defines the node payload stored in the recency list.

use crate::cache::Value;

// == Cache Entry ==
/// A resident key-value pair together with the bytes it was charged.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key, immutable once created
    pub key: String,
    /// The stored value
    pub value: V,
    /// Bytes charged against the budget: `key.len() + value.byte_len()`
    pub charged: u128,
}

impl<V: Value> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry, measuring the value once.
    pub fn new(key: String, value: V) -> Self {
        let charged = entry_size(&key, &value);
        Self {
            key,
            value,
            charged,
        }
    }

    // == Replace ==
    /// Swaps in a new value and returns the old one.
    ///
    /// The charge is re-measured for the new value only.
    pub fn replace(&mut self, value: V) -> V {
        self.charged = entry_size(&self.key, &value);
        std::mem::replace(&mut self.value, value)
    }
}

// == Utility Functions ==
/// Returns the number of bytes an entry with this key and value costs.
///
/// Widened to `u128` so that no `byte_len()` reading can overflow the sum.
pub fn entry_size<V: Value + ?Sized>(key: &str, value: &V) -> u128 {
    key.len() as u128 + value.byte_len() as u128
}

/// Clamps an internal byte count to the `u64` range exposed publicly.
pub fn saturate_bytes(bytes: u128) -> u64 {
    u64::try_from(bytes).unwrap_or(u64::MAX)
}
