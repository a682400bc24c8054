//! Integration Tests for the Cache
//!
//! Drives the public API through the end-to-end scenarios the cache must
//! support: unbounded use, budget eviction, eviction hooks, in-place updates
//! and oversized entries.

use std::sync::{Arc, Mutex};

use mini_lru::{Cache, Value};

// == Helper Types ==

/// Opaque payload that only reports a size.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Blob(usize);

impl Value for Blob {
    fn byte_len(&self) -> usize {
        self.0
    }
}

type EvictionLog = Arc<Mutex<Vec<(String, Blob)>>>;

fn logging_cache(max_bytes: u64) -> (Cache<Blob>, EvictionLog) {
    let log: EvictionLog = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let cache = Cache::with_eviction_callback(max_bytes, move |key, value| {
        sink.lock().unwrap().push((key, value));
    });
    (cache, log)
}

fn resident_bytes(cache: &Cache<Blob>) -> u64 {
    cache
        .iter()
        .map(|(k, v)| (k.len() + v.byte_len()) as u64)
        .sum()
}

// == Scenarios ==

#[test]
fn test_unbounded_cache_keeps_everything() {
    let mut cache = Cache::new(0);
    cache.add("a", Blob(1));
    cache.add("b", Blob(1));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("a"), Some(&Blob(1)));
    assert_eq!(cache.get("b"), Some(&Blob(1)));
    assert_eq!(cache.used_bytes(), 4);
}

#[test]
fn test_budget_evicts_least_recent() {
    // keys are one byte, so each entry costs 1 + 4 = 5
    let mut cache = Cache::new(10);
    cache.add("a", Blob(4));
    cache.add("b", Blob(4));
    assert_eq!(cache.used_bytes(), 10);

    cache.add("c", Blob(4));

    assert!(cache.used_bytes() <= 10);
    assert!(cache.get("a").is_none());
    assert!(cache.get("b").is_some());
    assert!(cache.get("c").is_some());
}

#[test]
fn test_eviction_hook_sees_exactly_the_evicted_entry() {
    let (mut cache, log) = logging_cache(12);
    cache.add("k1", Blob(4));
    cache.add("k2", Blob(4));
    cache.add("k3", Blob(4));

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], ("k1".to_string(), Blob(4)));
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_update_moves_key_to_most_recent() {
    let (mut cache, log) = logging_cache(16);
    cache.add("x", Blob(3));
    cache.add("y", Blob(3));
    let before = cache.used_bytes();

    cache.add("x", Blob(7));
    assert_eq!(cache.used_bytes() - before, 7 - 3);
    assert_eq!(cache.len(), 2);

    // 8 + 4 + 5 = 17 is over budget, so the true LRU ("y") goes
    cache.add("z", Blob(4));
    assert!(cache.contains("x"));
    assert!(!cache.contains("y"));
    assert_eq!(log.lock().unwrap()[0].0, "y");
    assert_eq!(cache.used_bytes(), resident_bytes(&cache));
}

#[test]
fn test_oversized_entry_evicts_itself() {
    let (mut cache, log) = logging_cache(5);
    cache.add("huge", Blob(100));

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.used_bytes(), 0);
    assert_eq!(*log.lock().unwrap(), vec![("huge".to_string(), Blob(100))]);
}

#[test]
fn test_oversized_entry_flushes_older_entries_first() {
    let (mut cache, log) = logging_cache(10);
    cache.add("a", Blob(2));
    cache.add("b", Blob(2));
    cache.add("huge", Blob(50));

    let keys: Vec<String> = log.lock().unwrap().iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(keys, vec!["a", "b", "huge"]);
    assert!(cache.is_empty());
}

#[test]
fn test_accounting_holds_through_mixed_operations() {
    let (mut cache, _log) = logging_cache(40);
    for round in 0..20usize {
        let key = format!("k{}", round % 7);
        cache.add(key.clone(), Blob(round % 9));
        cache.get(&format!("k{}", (round * 3) % 7));
        if round % 5 == 0 {
            cache.remove_oldest();
        }
        if round % 6 == 0 {
            cache.remove(&key);
        }
        assert_eq!(cache.used_bytes(), resident_bytes(&cache));
        assert!(cache.used_bytes() <= 40 || cache.is_empty());
        assert_eq!(cache.iter().count(), cache.len());
    }
}

#[test]
fn test_shared_values_through_arc() {
    let payload: Arc<[u8]> = Arc::from(vec![0u8; 6]);
    let mut cache = Cache::new(0);
    cache.add("p", Arc::clone(&payload));

    assert_eq!(cache.used_bytes(), 7);
    assert_eq!(Arc::strong_count(&payload), 2);

    cache.remove_oldest();
    assert_eq!(Arc::strong_count(&payload), 1);
}
