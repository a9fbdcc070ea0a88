//! # gvpool - bounded concurrency task pool
//!
//! Submit asynchronous work; at most `capacity` items run at once, the
//! rest wait in submission order. Each item's completion callback fires
//! exactly once, when its action reports done.
//!
//! ## Quick Start
//!
//! ```ignore
//! use gvpool::{Pool, PoolConfig};
//! use std::thread;
//!
//! fn main() -> gvpool::PoolResult<()> {
//!     let pool: Pool<&'static str, usize> =
//!         Pool::with_config(PoolConfig::new().capacity(2).name("fetch"))?;
//!
//!     for url in ["a.example", "b.example", "c.example"] {
//!         pool.enqueue(
//!             |url, done| {
//!                 thread::spawn(move || done.complete(url.len()));
//!             },
//!             |len| println!("fetched {} bytes", len),
//!             url,
//!         );
//!     }
//!
//!     // Or get the value back instead of a callback
//!     let len = pool.submit(|url, done| done.complete(url.len()), "d.example");
//!     assert_eq!(len.recv()?, 9);
//!
//!     pool.wait_idle();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      User Code                              │
//! │          enqueue(), submit(), remove(), wait_idle()         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Pool  (one Mutex + Condvar)                 │
//! │     Backlog (FIFO)  ──admit──►  running ≤ capacity          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ action(args, Done)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller-chosen execution (threads, I/O)         │
//! │         Done::complete(value) ──► on_complete(value)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pool spawns no threads of its own.

mod backlog;
mod completion;
mod config;
mod pool;
mod stats;
mod tls;

pub use completion::Completion;
pub use config::PoolConfig;
pub use pool::{Done, Pool};
pub use stats::PoolStats;

// Re-export core types
pub use gvpool_core::{PoolError, PoolResult, TryRecvError, WorkId};

// Re-export kprint macros for leveled logging
pub use gvpool_core::{kerror, kwarn, kinfo, kdebug, ktrace};
pub use gvpool_core::kprint::{LogLevel, init as init_logging, set_log_level, set_flush_enabled, set_time_enabled};

// Re-export env utilities
pub use gvpool_core::{env_get, env_get_bool, env_get_opt, env_get_str, env_is_set, env_parse};
