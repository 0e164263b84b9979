//! Error types for the aged cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the aged cache.
///
/// Missing or expired keys are not errors; lookups report them as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected input: absent key or value, non-positive retention, zero capacity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

// == Result Type Alias ==
/// Convenience Result type for the aged cache.
pub type Result<T> = std::result::Result<T, CacheError>;
