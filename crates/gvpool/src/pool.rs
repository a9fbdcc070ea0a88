//! The bounded concurrency gate
//!
//! A [`Pool`] runs at most `capacity` work items at once. Everything else
//! waits in a FIFO backlog. An item's action receives its argument
//! bundle and a [`Done`] handle; completing the handle gives the slot back,
//! runs the item's callback, and admits as much pending work as now fits.
//!
//! # Locking
//!
//! `backlog` and `running` sit behind one mutex. The lock is never held
//! while user code runs, so actions may complete synchronously, from
//! another thread, or enqueue more work from inside a callback.
//!
//! ```text
//!   enqueue ──► backlog ──admit──► running ──Done::complete──► on_complete
//!                  ▲                  │                            │
//!                  └──── remove       └──── slot released ◄────────┘
//!                                            then admit again
//! ```

use crate::backlog::Backlog;
use crate::completion::{completion, Completion};
use crate::config::PoolConfig;
use crate::stats::{Counters, PoolStats};
use crate::tls;

use gvpool_core::{kdebug, ktrace, PoolResult, WorkId, WorkIdGen};

use std::fmt;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

type Action<A, R> = Box<dyn FnOnce(A, Done<R>) + Send>;
type Callback<R> = Box<dyn FnOnce(R) + Send>;

/// One submitted unit of work
struct WorkItem<A, R> {
    id: WorkId,
    action: Action<A, R>,
    args: A,
    on_complete: Callback<R>,
}

/// Everything guarded by the pool lock
struct State<A, R> {
    backlog: Backlog<WorkItem<A, R>>,
    /// Admitted, completion handle not yet fired
    running: usize,
    /// Slot released, `on_complete` still executing
    finishing: usize,
}

impl<A, R> State<A, R> {
    #[inline]
    fn is_idle(&self) -> bool {
        self.running == 0 && self.finishing == 0 && self.backlog.is_empty()
    }
}

struct PoolInner<A, R> {
    state: Mutex<State<A, R>>,
    /// Signalled whenever the pool goes idle
    idle: Condvar,
    capacity: usize,
    name: String,
    ids: WorkIdGen,
    counters: Counters,
}

/// How `admit` treats a live admit loop for the same pool on this thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Admit {
    /// Run the admission check regardless (new work, or a panicking callback)
    Always,
    /// Leave it to the outer loop (a synchronous completion settled)
    Deferred,
}

/// What a [`Done`] handle calls back into, with the pool's types erased
trait SlotRelease: Send + Sync {
    /// Give the slot back; the item's callback runs next
    fn release(&self, id: WorkId);

    /// The callback returned or unwound; admit whatever fits now
    ///
    /// `unwinding` is set when the callback panicked. An admit loop further
    /// up this thread is unwinding too and will not resume, so admission
    /// runs here.
    fn settle(self: Arc<Self>, unwinding: bool);
}

/// Completion handle passed to every admitted action
///
/// Call [`complete`](Done::complete) exactly once when the work is done.
/// It consumes the handle, so a second completion cannot be expressed.
/// Dropping the handle without completing leaves its slot occupied for
/// the lifetime of the pool.
pub struct Done<R> {
    id: WorkId,
    slots: Arc<dyn SlotRelease>,
    on_complete: Callback<R>,
}

impl<R> Done<R> {
    /// Id of the work item this handle belongs to
    #[inline]
    pub fn id(&self) -> WorkId {
        self.id
    }

    /// Report the result: frees the slot, then calls the item's
    /// `on_complete` with `value`, then admits pending work
    pub fn complete(self, value: R) {
        let Done { id, slots, on_complete } = self;
        slots.release(id);
        let _settle = Settle(Some(slots));
        on_complete(value);
    }
}

/// Settles the slot when dropped, including while a panicking
/// `on_complete` unwinds
struct Settle(Option<Arc<dyn SlotRelease>>);

impl Drop for Settle {
    fn drop(&mut self) {
        if let Some(slots) = self.0.take() {
            slots.settle(std::thread::panicking());
        }
    }
}

impl<R> fmt::Debug for Done<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done").field("id", &self.id).finish()
    }
}

/// Bounded-concurrency task pool
///
/// `A` is the argument bundle each action receives, `R` the value its
/// completion handle reports. Cloning is cheap and every clone drives the
/// same pool.
///
/// ```ignore
/// let pool: Pool<u64, u64> = Pool::new(2)?;
/// pool.enqueue(
///     |n, done| { std::thread::spawn(move || done.complete(n * 2)); },
///     |doubled| println!("got {}", doubled),
///     21,
/// );
/// pool.wait_idle();
/// ```
pub struct Pool<A = (), R = ()> {
    inner: Arc<PoolInner<A, R>>,
}

impl<A, R> Clone for Pool<A, R> {
    fn clone(&self) -> Self {
        Pool { inner: Arc::clone(&self.inner) }
    }
}

impl<A, R> Pool<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// Create a pool running at most `capacity` items at once
    ///
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> PoolResult<Self> {
        Self::with_config(PoolConfig::new().capacity(capacity))
    }

    /// Create a pool from a full configuration
    pub fn with_config(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Create a pool configured by `GVPOOL_CAPACITY` / `GVPOOL_NAME`
    pub fn from_env() -> PoolResult<Self> {
        Self::with_config(PoolConfig::from_env()?)
    }

    fn build(config: PoolConfig) -> Self {
        kdebug!("[{}] pool created, capacity={}", config.name, config.capacity);
        Pool {
            inner: Arc::new(PoolInner {
                state: Mutex::new(State {
                    backlog: Backlog::new(),
                    running: 0,
                    finishing: 0,
                }),
                idle: Condvar::new(),
                capacity: config.capacity,
                name: config.name,
                ids: WorkIdGen::new(),
                counters: Counters::default(),
            }),
        }
    }

    /// Queue `action` to run with `args`, calling `on_complete` with the
    /// value it reports
    ///
    /// The item starts right away if a slot is free, possibly on this
    /// thread before `enqueue` returns. Returns `self` for chaining.
    pub fn enqueue<F, C>(&self, action: F, on_complete: C, args: A) -> &Self
    where
        F: FnOnce(A, Done<R>) + Send + 'static,
        C: FnOnce(R) + Send + 'static,
    {
        let id = {
            let mut state = self.inner.lock();
            let id = self.inner.ids.next();
            state.backlog.push_back(WorkItem {
                id,
                action: Box::new(action),
                args,
                on_complete: Box::new(on_complete),
            });
            id
        };
        Counters::bump(&self.inner.counters.submitted, 1);
        ktrace!("[{}] enqueue {}", self.inner.name, id);

        Arc::clone(&self.inner).admit(Admit::Always);
        self
    }

    /// Queue `action` and receive its value through a [`Completion`]
    ///
    /// If the item is pruned by [`remove`](Pool::remove) before it starts,
    /// the completion reports `PoolError::Disconnected`.
    pub fn submit<F>(&self, action: F, args: A) -> Completion<R>
    where
        F: FnOnce(A, Done<R>) + Send + 'static,
    {
        let (tx, rx) = completion();
        self.enqueue(action, move |value| tx.send(value), args);
        rx
    }

    /// Drop up to `count` pending items starting at backlog position
    /// `index`
    ///
    /// Negative `index` counts back from the tail. Running items are never
    /// touched and removed items never call their callbacks.
    pub fn remove(&self, index: isize, count: isize) -> &Self {
        let removed = {
            let mut state = self.inner.lock();
            let removed = state.backlog.splice(index, count);
            if state.is_idle() {
                self.inner.idle.notify_all();
            }
            removed
        };

        if !removed.is_empty() {
            Counters::bump(&self.inner.counters.removed, removed.len() as u64);
            kdebug!(
                "[{}] removed {} pending item(s) at index={} count={}",
                self.inner.name,
                removed.len(),
                index,
                count
            );
        }
        // Dropped outside the lock: closures may run arbitrary Drop code
        drop(removed);
        self
    }
}

impl<A, R> Pool<A, R> {
    /// Maximum concurrently running items
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Label used in log lines
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Items currently running
    pub fn running(&self) -> usize {
        self.inner.lock().running
    }

    /// Items waiting in the backlog
    pub fn pending(&self) -> usize {
        self.inner.lock().backlog.len()
    }

    /// Nothing running, nothing pending, no callback in flight
    pub fn is_idle(&self) -> bool {
        self.inner.lock().is_idle()
    }

    /// Snapshot of gauges and counters
    pub fn stats(&self) -> PoolStats {
        let (running, pending) = {
            let state = self.inner.lock();
            (state.running, state.backlog.len())
        };
        self.inner.counters.snapshot(self.inner.capacity, running, pending)
    }

    /// Block the calling thread until the pool is idle
    ///
    /// Never call this from inside an action or callback of the same pool:
    /// the work it waits for may need this thread to finish.
    pub fn wait_idle(&self) {
        let mut state = self.inner.lock();
        while !state.is_idle() {
            state = self.inner.idle.wait(state).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Like [`wait_idle`](Pool::wait_idle) with a deadline
    ///
    /// Returns `true` if the pool went idle in time.
    pub fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.lock();
        while !state.is_idle() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .inner
                .idle
                .wait_timeout(state, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        true
    }
}

impl<A, R> Default for Pool<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// A pool with capacity 1
    fn default() -> Self {
        Self::build(PoolConfig::default())
    }
}

impl<A, R> fmt::Debug for Pool<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Pool")
            .field("name", &self.inner.name)
            .field("capacity", &self.inner.capacity)
            .field("running", &state.running)
            .field("pending", &state.backlog.len())
            .finish()
    }
}

impl<A, R> PoolInner<A, R> {
    #[inline]
    fn lock(&self) -> MutexGuard<'_, State<A, R>> {
        // User code never runs under this lock; a poisoned guard still
        // holds consistent counts
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Identity used for thread-local drain tracking
    #[inline]
    fn key(&self) -> usize {
        self as *const Self as usize
    }
}

impl<A, R> PoolInner<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// Admit pending items until the pool is full or the backlog is empty
    ///
    /// With [`Admit::Deferred`], re-entry while an admit loop for this pool
    /// is live on this thread returns at once; the outer loop picks up
    /// where it left off.
    fn admit(self: Arc<Self>, mode: Admit) {
        let _drain = match tls::enter_drain(self.key()) {
            Some(guard) => Some(guard),
            None if mode == Admit::Always => None,
            None => return,
        };

        loop {
            let item = {
                let mut state = self.lock();
                if state.running >= self.capacity {
                    return;
                }
                match state.backlog.pop_front() {
                    Some(item) => {
                        state.running += 1;
                        item
                    }
                    None => {
                        if state.is_idle() {
                            self.idle.notify_all();
                        }
                        return;
                    }
                }
            };
            Counters::bump(&self.counters.admitted, 1);

            let WorkItem { id, action, args, on_complete } = item;
            ktrace!("[{}] admit {}", self.name, id);

            let slots: Arc<dyn SlotRelease> = Arc::clone(&self) as Arc<dyn SlotRelease>;
            action(args, Done { id, slots, on_complete });
        }
    }
}

impl<A, R> SlotRelease for PoolInner<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    fn release(&self, id: WorkId) {
        {
            let mut state = self.lock();
            debug_assert!(state.running > 0, "completion without a running item");
            state.running = state.running.saturating_sub(1);
            state.finishing += 1;
        }
        Counters::bump(&self.counters.completed, 1);
        ktrace!("[{}] complete {}", self.name, id);
    }

    fn settle(self: Arc<Self>, unwinding: bool) {
        {
            let mut state = self.lock();
            state.finishing = state.finishing.saturating_sub(1);
            if state.is_idle() {
                self.idle.notify_all();
            }
        }
        self.admit(if unwinding { Admit::Always } else { Admit::Deferred });
    }
}
