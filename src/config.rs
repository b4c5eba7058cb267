//! Configuration Module
//!
//! Construction parameters for a cache, loadable from environment variables
//! or deserialized from whatever configuration source the host application uses.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{CacheError, Result};

/// Longest default time-to-live accepted from configuration.
pub const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Environment variable holding the entry capacity.
pub const CAPACITY_VAR: &str = "CACHE_CAPACITY";

/// Environment variable holding the default time-to-live in milliseconds.
pub const DEFAULT_TTL_VAR: &str = "CACHE_DEFAULT_TTL_MS";

/// Cache construction parameters.
///
/// Unsigned fields make negative values unrepresentable; they are rejected
/// when parsed rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries, 0 = unlimited
    pub capacity: usize,
    /// Default time-to-live in milliseconds, 0 = never expires
    pub default_ttl_ms: u64,
}

impl CacheConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 0)
    ///
    /// A variable that is set but malformed is an error, not a silent default.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|name| env::var(name))
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, env::VarError>,
    {
        let defaults = Self::default();
        let config = Self {
            capacity: parse_var(&lookup, CAPACITY_VAR, defaults.capacity)?,
            default_ttl_ms: parse_var(&lookup, DEFAULT_TTL_VAR, defaults.default_ttl_ms)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values that are well-typed but still unusable.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl() > MAX_TTL {
            return Err(CacheError::invalid_config(
                "default_ttl_ms",
                self.default_ttl_ms.to_string(),
                format!("must not exceed {} ms", MAX_TTL.as_millis()),
            ));
        }
        Ok(())
    }

    /// Default time-to-live as a `Duration`.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            default_ttl_ms: 0,
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T>
where
    F: Fn(&str) -> std::result::Result<String, env::VarError>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| CacheError::invalid_config(name, raw.clone(), e.to_string())),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(CacheError::invalid_config(name, "", e.to_string())),
    }
}
