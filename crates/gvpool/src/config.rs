//! Pool configuration

use gvpool_core::constants::{DEFAULT_CAPACITY, DEFAULT_POOL_NAME, ENV_CAPACITY, ENV_NAME};
use gvpool_core::env::{env_get_str, env_parse};
use gvpool_core::{PoolError, PoolResult};

/// Configuration for a [`Pool`](crate::Pool)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of concurrently running work items (default: 1)
    pub capacity: usize,

    /// Label used in log lines
    pub name: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            name: DEFAULT_POOL_NAME.to_string(),
        }
    }
}

impl PoolConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency limit
    pub fn capacity(mut self, n: usize) -> Self {
        self.capacity = n;
        self
    }

    /// Set the log label
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Build from `GVPOOL_CAPACITY` and `GVPOOL_NAME`
    ///
    /// Unset variables keep their defaults. A capacity that is set but is
    /// not a positive integer is an `InvalidArgument`.
    pub fn from_env() -> PoolResult<Self> {
        let capacity = match env_parse::<usize>(ENV_CAPACITY) {
            Ok(Some(n)) => n,
            Ok(None) => DEFAULT_CAPACITY,
            Err(raw) => return Err(capacity_error(format!("must be a number, got {:?}", raw))),
        };
        let config = Self {
            capacity,
            name: env_get_str(ENV_NAME, DEFAULT_POOL_NAME),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a textual capacity
    ///
    /// An empty string means "not given" and yields the default of 1.
    pub fn parse_capacity(raw: &str) -> PoolResult<usize> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(DEFAULT_CAPACITY);
        }
        let n: usize = raw
            .parse()
            .map_err(|_| capacity_error(format!("must be a number, got {:?}", raw)))?;
        validate_capacity(n)?;
        Ok(n)
    }

    /// Validate configuration
    pub fn validate(&self) -> PoolResult<()> {
        validate_capacity(self.capacity)
    }
}

fn validate_capacity(n: usize) -> PoolResult<()> {
    if n == 0 {
        return Err(capacity_error("must be a positive number, got 0"));
    }
    Ok(())
}

fn capacity_error(reason: impl Into<String>) -> PoolError {
    PoolError::invalid_argument(1, "capacity", reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PoolConfig::default();
        assert_eq!(config.capacity, 1);
        assert_eq!(config.name, "pool");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PoolConfig::new().capacity(4).name("fetch");
        assert_eq!(config.capacity, 4);
        assert_eq!(config.name, "fetch");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = PoolConfig::new().capacity(0).validate().unwrap_err();
        assert!(matches!(
            err,
            PoolError::InvalidArgument { position: 1, name: "capacity", .. }
        ));
    }

    #[test]
    fn test_parse_capacity() {
        assert_eq!(PoolConfig::parse_capacity("3"), Ok(3));
        assert_eq!(PoolConfig::parse_capacity(""), Ok(1));
        assert!(PoolConfig::parse_capacity("x").unwrap_err().is_invalid_argument());
        assert!(PoolConfig::parse_capacity("0").unwrap_err().is_invalid_argument());
        assert!(PoolConfig::parse_capacity("-2").unwrap_err().is_invalid_argument());
    }

    // Only this test touches GVPOOL_* variables in this crate.
    #[test]
    fn test_from_env() {
        std::env::remove_var(ENV_CAPACITY);
        std::env::remove_var(ENV_NAME);
        assert_eq!(PoolConfig::from_env(), Ok(PoolConfig::default()));

        std::env::set_var(ENV_CAPACITY, "6");
        std::env::set_var(ENV_NAME, "uploads");
        let config = PoolConfig::from_env().unwrap();
        assert_eq!(config.capacity, 6);
        assert_eq!(config.name, "uploads");

        std::env::set_var(ENV_CAPACITY, "x");
        assert!(PoolConfig::from_env().unwrap_err().is_invalid_argument());

        std::env::set_var(ENV_CAPACITY, "0");
        assert!(PoolConfig::from_env().unwrap_err().is_invalid_argument());

        std::env::remove_var(ENV_CAPACITY);
        std::env::remove_var(ENV_NAME);
    }
}
