//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list and a byte
//! budget enforced by least-recently-used eviction.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::cache::{saturate_bytes, CacheEntry, CacheStats, Handle, RecencyList, Value};

/// Hook invoked with ownership of every evicted key and value.
pub type EvictionCallback<V> = Box<dyn FnMut(String, V) + Send>;

// == Cache ==
/// In-memory key-value cache bounded by a byte budget.
///
/// Every resident entry costs `key.len() + value.byte_len()` bytes. When an
/// [`add`](Cache::add) pushes usage above `max_bytes`, entries are evicted
/// from the least recently used end until usage fits again or the cache is
/// empty. A budget of 0 disables eviction.
///
/// The cache does no internal locking. Share it across threads by wrapping it
/// in a mutex and holding the lock for the duration of each call.
pub struct Cache<V> {
    /// Recency-ordered entries
    order: RecencyList<CacheEntry<V>>,
    /// Key to node handle
    index: HashMap<String, Handle>,
    /// Byte budget, 0 = unbounded
    max_bytes: u64,
    /// Sum of charges over resident entries, wide enough to never overflow
    used_bytes: u128,
    /// Optional eviction hook
    on_evicted: Option<EvictionCallback<V>>,
    /// Performance statistics
    stats: CacheStats,
}

impl<V: Value> Cache<V> {
    // == Constructor ==
    /// Creates an empty cache with the given byte budget and no eviction hook.
    pub fn new(max_bytes: u64) -> Self {
        CacheBuilder::new(max_bytes).build()
    }

    /// Creates an empty cache that calls `on_evicted` for each evicted entry.
    pub fn with_eviction_callback<F>(max_bytes: u64, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        CacheBuilder::new(max_bytes).on_evicted(on_evicted).build()
    }

    /// Returns a builder for a cache with the given byte budget.
    pub fn builder(max_bytes: u64) -> CacheBuilder<V> {
        CacheBuilder::new(max_bytes)
    }

    // == Get ==
    /// Looks up `key` and marks it as most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        self.stats.record_hit();
        self.order.move_to_front(handle);
        self.order.get(handle).map(|entry| &entry.value)
    }

    // == Add ==
    /// Inserts or replaces the value for `key`, then evicts as needed.
    ///
    /// The entry just written may itself be evicted when it alone exceeds the
    /// budget.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        match self.index.get(&key).copied() {
            Some(handle) => {
                self.order.move_to_front(handle);
                if let Some(entry) = self.order.get_mut(handle) {
                    let old_charge = entry.charged;
                    drop(entry.replace(value));
                    self.used_bytes = self.used_bytes - old_charge + entry.charged;
                    trace!(
                        key = %entry.key,
                        bytes = saturate_bytes(entry.charged),
                        "Updated cache entry"
                    );
                }
                self.stats.record_update();
            }
            None => {
                let entry = CacheEntry::new(key.clone(), value);
                self.used_bytes += entry.charged;
                trace!(key = %key, bytes = saturate_bytes(entry.charged), "Inserted cache entry");
                let handle = self.order.push_front(entry);
                self.index.insert(key, handle);
                self.stats.record_insertion();
            }
        }

        while self.max_bytes != 0 && self.used_bytes > u128::from(self.max_bytes) {
            self.remove_oldest();
        }
    }

    // == Remove Oldest ==
    /// Evicts the least recently used entry, if any.
    ///
    /// Internal state is fully updated before the eviction hook runs.
    pub fn remove_oldest(&mut self) {
        let Some(entry) = self.order.pop_back() else {
            return;
        };

        self.index.remove(&entry.key);
        self.used_bytes -= entry.charged;
        self.stats.record_eviction();
        debug!(
            key = %entry.key,
            bytes = saturate_bytes(entry.charged),
            used_bytes = self.used_bytes(),
            "Evicted least recently used entry"
        );

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key, entry.value);
        }
    }

    // == Remove ==
    /// Removes `key` and hands its value back to the caller.
    ///
    /// This is not an eviction: the eviction hook is not called.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let handle = self.index.remove(key)?;
        let entry = self.order.remove(handle)?;
        self.used_bytes -= entry.charged;
        trace!(key = %entry.key, bytes = saturate_bytes(entry.charged), "Removed cache entry");
        Some(entry.value)
    }

    // == Clear ==
    /// Drops every entry without calling the eviction hook.
    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
        self.used_bytes = 0;
    }
}

impl<V> Cache<V> {
    // == Peek ==
    /// Looks up `key` without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let handle = self.index.get(key)?;
        self.order.get(*handle).map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks membership without touching recency.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bytes currently charged against the budget, saturating at `u64::MAX`.
    pub fn used_bytes(&self) -> u64 {
        saturate_bytes(self.used_bytes)
    }

    /// The byte budget this cache was created with (0 = unbounded).
    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    // == Iter ==
    /// Iterates `(key, value)` pairs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.order
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.order.len();
        stats.used_bytes = self.used_bytes();
        stats
    }
}

impl<V> fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes())
            .field("len", &self.order.len())
            .field("on_evicted", &self.on_evicted.is_some())
            .field("stats", &self.stats())
            .finish()
    }
}

// == Cache Builder ==
/// Configures a [`Cache`] before construction.
pub struct CacheBuilder<V> {
    max_bytes: u64,
    capacity: usize,
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> CacheBuilder<V> {
    /// Starts a builder for a cache with the given byte budget.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            capacity: 0,
            on_evicted: None,
        }
    }

    /// Pre-allocates room for `capacity` entries.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the hook called with each evicted key and value.
    pub fn on_evicted<F>(mut self, on_evicted: F) -> Self
    where
        F: FnMut(String, V) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(on_evicted));
        self
    }

    /// Creates the empty cache.
    pub fn build(self) -> Cache<V> {
        Cache {
            order: RecencyList::with_capacity(self.capacity),
            index: HashMap::with_capacity(self.capacity),
            max_bytes: self.max_bytes,
            used_bytes: 0,
            on_evicted: self.on_evicted,
            stats: CacheStats::new(),
        }
    }
}
