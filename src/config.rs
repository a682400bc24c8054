//! Configuration Module
//!
//! Loads workload driver settings from environment variables.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use serde::Serialize;

use crate::cache::{Cache, CacheBuilder, Value};
use crate::error::{CacheError, Result};

/// Workload driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Byte budget of the shared cache, 0 = unbounded
    pub max_bytes: u64,
    /// Number of concurrent worker tasks
    pub workers: usize,
    /// Operations each worker performs
    pub ops_per_worker: usize,
    /// Number of distinct keys the workload draws from
    pub key_space: usize,
    /// Size in bytes of every value written
    pub value_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset variables fall back to their defaults; set but malformed
    /// variables are rejected.
    ///
    /// # Environment Variables
    /// - `MAX_BYTES` - Cache byte budget (default: 65536)
    /// - `WORKERS` - Worker task count, at least 1 (default: 4)
    /// - `OPS_PER_WORKER` - Operations per worker (default: 10000)
    /// - `KEY_SPACE` - Distinct keys, at least 1 (default: 1024)
    /// - `VALUE_SIZE` - Bytes per value (default: 64)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a Config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            max_bytes: parse_var(&lookup, "MAX_BYTES", defaults.max_bytes)?,
            workers: parse_var(&lookup, "WORKERS", defaults.workers)?,
            ops_per_worker: parse_var(&lookup, "OPS_PER_WORKER", defaults.ops_per_worker)?,
            key_space: parse_var(&lookup, "KEY_SPACE", defaults.key_space)?,
            value_size: parse_var(&lookup, "VALUE_SIZE", defaults.value_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Returns a cache builder with the configured budget, pre-sized for
    /// the whole key space.
    pub fn cache_builder<V: Value>(&self) -> CacheBuilder<V> {
        Cache::builder(self.max_bytes).with_capacity(self.key_space)
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(invalid("WORKERS", "0", "must be at least 1"));
        }
        if self.key_space == 0 {
            return Err(invalid("KEY_SPACE", "0", "must be at least 1"));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_bytes: 64 * 1024,
            workers: 4,
            ops_per_worker: 10_000,
            key_space: 1024,
            value_size: 64,
        }
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, e)),
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Display) -> CacheError {
    CacheError::InvalidConfig {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_bytes, 65536);
        assert_eq!(config.workers, 4);
        assert_eq!(config.ops_per_worker, 10_000);
        assert_eq!(config.key_space, 1024);
        assert_eq!(config.value_size, 64);
    }

    #[test]
    fn test_config_from_empty_source_uses_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("MAX_BYTES", "0"),
            ("WORKERS", " 2 "),
            ("VALUE_SIZE", "8"),
        ]))
        .unwrap();
        assert_eq!(config.max_bytes, 0);
        assert_eq!(config.workers, 2);
        assert_eq!(config.value_size, 8);
        assert_eq!(config.key_space, 1024);
    }

    #[test]
    fn test_config_rejects_negative_budget() {
        let err = Config::from_lookup(lookup_from(&[("MAX_BYTES", "-5")])).unwrap_err();
        assert!(matches!(
            err,
            CacheError::InvalidConfig { var: "MAX_BYTES", .. }
        ));
    }

    #[test]
    fn test_config_rejects_zero_workers() {
        let err = Config::from_lookup(lookup_from(&[("WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfig { var: "WORKERS", .. }));
    }

    #[test]
    fn test_config_builds_cache() {
        let config = Config {
            max_bytes: 10,
            ..Config::default()
        };
        let cache: Cache<String> = config.cache_builder().build();
        assert_eq!(cache.max_bytes(), 10);
        assert!(cache.is_empty());
    }
}
