//! Error types for the task pool

use core::fmt;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur in pool operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A caller-supplied argument was rejected before any state changed
    InvalidArgument {
        /// 1-based position of the offending argument
        position: usize,
        /// Parameter name
        name: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The work item was dropped before it produced a value
    /// (removed from the backlog, or its pool went away)
    Disconnected,

    /// Waiting for a completion timed out
    Timeout,
}

impl PoolError {
    /// Shorthand for building an `InvalidArgument`
    pub fn invalid_argument(position: usize, name: &'static str, reason: impl Into<String>) -> Self {
        PoolError::InvalidArgument {
            position,
            name,
            reason: reason.into(),
        }
    }

    /// True for the `InvalidArgument` kind
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, PoolError::InvalidArgument { .. })
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidArgument { position, name, reason } => {
                write!(f, "invalid argument {} (`{}`): {}", position, name, reason)
            }
            PoolError::Disconnected => write!(f, "work item dropped before completion"),
            PoolError::Timeout => write!(f, "timed out waiting for completion"),
        }
    }
}

impl std::error::Error for PoolError {}

/// Error returned by a non-blocking completion check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecvError {
    /// No value yet, the item is still pending or running
    Empty,
    /// The item will never produce a value
    Disconnected,
}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryRecvError::Empty => write!(f, "completion not ready"),
            TryRecvError::Disconnected => write!(f, "work item dropped before completion"),
        }
    }
}

impl std::error::Error for TryRecvError {}
