//! One-shot completion channel
//!
//! [`Pool::submit`](crate::Pool::submit) hands back a [`Completion`]
//! instead of taking a callback. The sending half rides inside the work
//! item's completion callback; if the item is dropped unrun (pruned from
//! the backlog) the sender's `Drop` marks the slot disconnected and wakes
//! any waiter.

use gvpool_core::{PoolError, PoolResult, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Create a connected sender/receiver pair
pub(crate) fn completion<R>() -> (CompletionSender<R>, Completion<R>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Waiting),
        cond: Condvar::new(),
    });
    (
        CompletionSender { slot: Some(Arc::clone(&slot)) },
        Completion { slot },
    )
}

enum SlotState<R> {
    Waiting,
    Ready(R),
    Taken,
    Disconnected,
}

struct Slot<R> {
    state: Mutex<SlotState<R>>,
    cond: Condvar,
}

impl<R> Slot<R> {
    fn lock(&self) -> MutexGuard<'_, SlotState<R>> {
        // Nothing panics while holding this lock; recover the guard anyway
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve(&self, next: SlotState<R>) {
        let mut state = self.lock();
        if matches!(*state, SlotState::Waiting) {
            *state = next;
            self.cond.notify_all();
        }
    }
}

/// Sending half, consumed by the first `send`
pub(crate) struct CompletionSender<R> {
    slot: Option<Arc<Slot<R>>>,
}

impl<R> CompletionSender<R> {
    pub(crate) fn send(mut self, value: R) {
        if let Some(slot) = self.slot.take() {
            slot.resolve(SlotState::Ready(value));
        }
    }
}

impl<R> Drop for CompletionSender<R> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.resolve(SlotState::Disconnected);
        }
    }
}

/// Receiving half: the eventual result of one submitted work item
pub struct Completion<R> {
    slot: Arc<Slot<R>>,
}

impl<R> Completion<R> {
    /// Block until the item completes
    ///
    /// Returns `Err(Disconnected)` if the item was dropped without running.
    /// Must not be called from the thread that is expected to complete it.
    pub fn recv(self) -> PoolResult<R> {
        let mut state = self.slot.lock();
        loop {
            match take(&mut state) {
                Ok(value) => return Ok(value),
                Err(TryRecvError::Disconnected) => return Err(PoolError::Disconnected),
                Err(TryRecvError::Empty) => {
                    state = self.slot.cond.wait(state).unwrap_or_else(|e| e.into_inner());
                }
            }
        }
    }

    /// Block until the item completes or `timeout` elapses
    pub fn recv_timeout(&self, timeout: Duration) -> PoolResult<R> {
        let deadline = Instant::now() + timeout;
        let mut state = self.slot.lock();
        loop {
            match take(&mut state) {
                Ok(value) => return Ok(value),
                Err(TryRecvError::Disconnected) => return Err(PoolError::Disconnected),
                Err(TryRecvError::Empty) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(PoolError::Timeout);
                    }
                    state = self
                        .slot
                        .cond
                        .wait_timeout(state, deadline - now)
                        .map(|(guard, _)| guard)
                        .unwrap_or_else(|e| e.into_inner().0);
                }
            }
        }
    }

    /// Take the value if it is already there
    pub fn try_recv(&self) -> Result<R, TryRecvError> {
        take(&mut self.slot.lock())
    }

    /// True once a value is waiting to be taken
    pub fn is_ready(&self) -> bool {
        matches!(*self.slot.lock(), SlotState::Ready(_))
    }
}

fn take<R>(state: &mut SlotState<R>) -> Result<R, TryRecvError> {
    match std::mem::replace(state, SlotState::Taken) {
        SlotState::Ready(value) => Ok(value),
        SlotState::Waiting => {
            *state = SlotState::Waiting;
            Err(TryRecvError::Empty)
        }
        SlotState::Taken | SlotState::Disconnected => {
            *state = SlotState::Disconnected;
            Err(TryRecvError::Disconnected)
        }
    }
}

impl<R> std::fmt::Debug for Completion<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("ready", &self.is_ready())
            .finish()
    }
}
