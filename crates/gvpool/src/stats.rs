//! Point-in-time pool counters

use core::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot returned by [`Pool::stats`](crate::Pool::stats)
///
/// `running` and `pending` are read under the pool lock together; the
/// monotonic counters are read right after and may already include work
/// that happened since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    pub capacity: usize,
    pub running: usize,
    pub pending: usize,
    /// Items ever enqueued
    pub submitted: u64,
    /// Items ever started
    pub admitted: u64,
    /// Items whose completion handle fired
    pub completed: u64,
    /// Pending items pruned by `remove`
    pub removed: u64,
}

impl PoolStats {
    /// Free slots right now
    pub fn available(&self) -> usize {
        self.capacity.saturating_sub(self.running)
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "running={}/{} pending={} submitted={} admitted={} completed={} removed={}",
            self.running,
            self.capacity,
            self.pending,
            self.submitted,
            self.admitted,
            self.completed,
            self.removed,
        )
    }
}

/// Monotonic counters kept by the pool
#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub submitted: AtomicU64,
    pub admitted: AtomicU64,
    pub completed: AtomicU64,
    pub removed: AtomicU64,
}

impl Counters {
    #[inline]
    pub fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }

    pub fn snapshot(&self, capacity: usize, running: usize, pending: usize) -> PoolStats {
        PoolStats {
            capacity,
            running,
            pending,
            submitted: self.submitted.load(Ordering::Relaxed),
            admitted: self.admitted.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            removed: self.removed.load(Ordering::Relaxed),
        }
    }
}
