//! Error types for the workload driver
//!
//! Cache operations are total and never fail; errors only arise at the
//! configuration edge and in the workload driver.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the crate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    /// An environment variable held a value that could not be used
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidConfig {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A workload task panicked or was cancelled
    #[error("Worker task failed: {0}")]
    WorkerFailed(String),
}

// == Result Type Alias ==
/// Convenience Result type for the crate.
pub type Result<T> = std::result::Result<T, CacheError>;
