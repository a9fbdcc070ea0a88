//! Thread-local drain tracking
//!
//! Records which pools the current OS thread is admitting work for. An
//! action that completes synchronously re-enters the pool from inside the
//! admit loop; the nested call sees the pool here and returns, leaving the
//! outer loop to admit the next item. Stack depth stays flat no matter how
//! many synchronous items are queued.

use std::cell::RefCell;

thread_local! {
    /// Keys of pools whose admit loop is live on this thread
    static DRAINING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks a pool as draining on this thread until dropped
pub(crate) struct DrainGuard {
    key: usize,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        DRAINING.with(|cell| {
            let mut keys = cell.borrow_mut();
            if let Some(pos) = keys.iter().rposition(|&k| k == self.key) {
                keys.swap_remove(pos);
            }
        });
    }
}

/// Claim the admit loop for `key` on this thread
///
/// Returns `None` when an outer frame on this thread already owns it.
#[inline]
pub(crate) fn enter_drain(key: usize) -> Option<DrainGuard> {
    DRAINING.with(|cell| {
        let mut keys = cell.borrow_mut();
        if keys.contains(&key) {
            None
        } else {
            keys.push(key);
            Some(DrainGuard { key })
        }
    })
}
