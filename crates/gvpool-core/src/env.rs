//! Environment variable helpers
//!
//! Pool configuration and logging both read `GVPOOL_*` variables through
//! these functions.
//!
//! ```ignore
//! use gvpool_core::env::{env_get, env_get_bool, env_parse};
//!
//! let capacity: usize = env_get("GVPOOL_CAPACITY", 1);
//! let flush = env_get_bool("GVPOOL_FLUSH_EPRINT", false);
//!
//! // Unset vs. garbage: Ok(None) vs. Err(raw)
//! match env_parse::<usize>("GVPOOL_CAPACITY") {
//!     Ok(Some(n)) => println!("capacity {}", n),
//!     Ok(None) => println!("default capacity"),
//!     Err(raw) => eprintln!("bad capacity {:?}", raw),
//! }
//! ```

use std::str::FromStr;

/// Get environment variable parsed as type T, or return default
///
/// Parse failures fall back to the default as well.
#[inline]
pub fn env_get<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    env_get_opt(key).unwrap_or(default)
}

/// Get environment variable as boolean
///
/// "1", "true", "yes", "on" (case-insensitive) are true, any other set
/// value is false, and an unset variable returns the default.
#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(val) => parse_bool(&val),
        Err(_) => default,
    }
}

/// Truthiness rule shared by `env_get_bool` and the logger
#[inline]
pub fn parse_bool(val: &str) -> bool {
    matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Get environment variable as optional value
///
/// `None` when unset or unparseable.
#[inline]
pub fn env_get_opt<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, keeping "unset" apart from "invalid"
///
/// - unset → `Ok(None)`
/// - set and parses → `Ok(Some(value))`
/// - set but does not parse → `Err(raw_value)`
pub fn env_parse<T>(key: &str) -> Result<Option<T>, String>
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| raw),
        Err(_) => Ok(None),
    }
}

/// Get environment variable as string, or return default
#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Check if environment variable is set (regardless of value)
#[inline]
pub fn env_is_set(key: &str) -> bool {
    std::env::var(key).is_ok()
}

// ============================================================================
// Tests
// ============================================================================
