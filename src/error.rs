//! Error types for the cache
//!
//! Cache operations themselves are total: a missing key is `None`, not an
//! error. The only failures come from misconfiguration, which is rejected
//! before a cache is built.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A configuration value could not be parsed or is out of range
    #[error("Invalid config value for {field} ({value:?}): {reason}")]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl CacheError {
    pub(crate) fn invalid_config(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CacheError::InvalidConfig {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
