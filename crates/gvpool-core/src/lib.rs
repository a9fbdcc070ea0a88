//! # gvpool-core
//!
//! Shared building blocks for the gvpool bounded task runner.
//!
//! No pool logic lives here, only the pieces every gvpool crate and
//! binary leans on.
//!
//! ## Modules
//!
//! - `id` - Work item identifier and its generator
//! - `error` - Error types
//! - `kprint` - Kernel-style leveled logging macros
//! - `env` - Environment variable utilities

pub mod id;
pub mod error;
pub mod kprint;
pub mod env;

// Re-exports for convenience
pub use id::{WorkId, WorkIdGen};
pub use error::{PoolError, PoolResult, TryRecvError};
pub use kprint::LogLevel;
pub use env::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set, env_parse};

/// Defaults shared by configuration and binaries
pub mod constants {
    /// Capacity used when none is given
    pub const DEFAULT_CAPACITY: usize = 1;

    /// Pool label used in log lines when none is given
    pub const DEFAULT_POOL_NAME: &str = "pool";

    /// Environment variable holding the pool capacity
    pub const ENV_CAPACITY: &str = "GVPOOL_CAPACITY";

    /// Environment variable holding the pool label
    pub const ENV_NAME: &str = "GVPOOL_NAME";
}
