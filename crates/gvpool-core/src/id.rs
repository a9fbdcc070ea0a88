//! Work item identifier type

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

/// Identifier assigned to a work item when it is enqueued
///
/// Ids are handed out in submission order by a [`WorkIdGen`], so comparing
/// two ids from the same pool tells which item was submitted first.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct WorkId(u64);

impl WorkId {
    /// Create a WorkId from a raw value
    #[inline]
    pub const fn new(id: u64) -> Self {
        WorkId(id)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for WorkId {
    #[inline]
    fn from(id: u64) -> Self {
        WorkId(id)
    }
}

impl From<WorkId> for u64 {
    #[inline]
    fn from(id: WorkId) -> Self {
        id.0
    }
}

impl fmt::Debug for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WorkId({})", self.0)
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic WorkId source, one per pool
#[derive(Debug, Default)]
pub struct WorkIdGen {
    next: AtomicU64,
}

impl WorkIdGen {
    pub const fn new() -> Self {
        Self { next: AtomicU64::new(0) }
    }

    /// Hand out the next id
    #[inline]
    pub fn next(&self) -> WorkId {
        WorkId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_work_id_basics() {
        let id = WorkId::new(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "#42");
        assert_eq!(format!("{:?}", id), "WorkId(42)");
    }

    #[test]
    fn test_work_id_conversions() {
        let id: WorkId = 100u64.into();
        let raw: u64 = id.into();
        assert_eq!(raw, 100);
    }

    #[test]
    fn test_gen_is_monotonic() {
        let gen = WorkIdGen::new();
        let a = gen.next();
        let b = gen.next();
        let c = gen.next();
        assert!(a < b && b < c);
        assert_eq!(c.as_u64(), 2);
    }
}
