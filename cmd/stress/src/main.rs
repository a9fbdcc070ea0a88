//! Stress test - many small tasks through one pool
//!
//! Actions hand their work to a fixed set of worker threads over a
//! lock-free `ArrayQueue`; workers complete each task from their own
//! thread. Reports throughput and the highest concurrency observed.
//!
//! Usage: `stress [tasks] [capacity] [workers]`

use crossbeam_queue::ArrayQueue;
use gvpool::{kinfo, kwarn, Done, Pool, PoolConfig};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

type Job = (u64, Done<u64>);

/// Fixed worker threads draining a bounded job queue
struct Workers {
    queue: Arc<ArrayQueue<Job>>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    handles: Vec<JoinHandle<()>>,
}

impl Workers {
    /// `depth` must cover the pool capacity so a push never fails
    fn start(n: usize, depth: usize, active: Arc<AtomicUsize>) -> Self {
        let queue = Arc::new(ArrayQueue::new(depth));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handles = (0..n)
            .map(|worker_id| {
                let queue = Arc::clone(&queue);
                let shutdown = Arc::clone(&shutdown);
                let active = Arc::clone(&active);
                thread::Builder::new()
                    .name(format!("gvpool-stress-{}", worker_id))
                    .spawn(move || worker_loop(queue, shutdown, active))
                    .unwrap_or_else(|e| {
                        eprintln!("failed to spawn worker {}: {}", worker_id, e);
                        std::process::exit(1);
                    })
            })
            .collect();

        Workers { queue, shutdown, active, handles }
    }

    fn submit(&self, job: Job) {
        if let Err((n, done)) = self.queue.push(job) {
            // Queue depth is sized to capacity; finish inline rather than lose the slot
            kwarn!("job queue full, completing {} inline", done.id());
            let result = work(n);
            self.active.fetch_sub(1, Ordering::SeqCst);
            done.complete(result);
        }
    }

    fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        for h in self.handles {
            let _ = h.join();
        }
    }
}

fn worker_loop(queue: Arc<ArrayQueue<Job>>, shutdown: Arc<AtomicBool>, active: Arc<AtomicUsize>) {
    loop {
        match queue.pop() {
            Some((n, done)) => {
                let result = work(n);
                active.fetch_sub(1, Ordering::SeqCst);
                done.complete(result);
            }
            None => {
                if shutdown.load(Ordering::Relaxed) {
                    break;
                }
                thread::park_timeout(Duration::from_micros(200));
            }
        }
    }
}

/// A little CPU work per task (xorshift rounds)
fn work(seed: u64) -> u64 {
    let mut x = seed | 1;
    for _ in 0..64 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
    }
    x
}

fn arg_or(n: usize, default: usize) -> usize {
    std::env::args()
        .nth(n)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() {
    println!("=== gvpool Stress Test ===\n");

    let num_tasks = arg_or(1, 100_000);
    let capacity = arg_or(2, 64);
    let num_workers = arg_or(
        3,
        thread::available_parallelism().map(|n| n.get()).unwrap_or(4),
    );

    let pool: Pool<u64, u64> = match Pool::with_config(PoolConfig::new().capacity(capacity).name("stress")) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot create pool: {}", e);
            std::process::exit(2);
        }
    };

    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicU64::new(0));
    let checksum = Arc::new(AtomicU64::new(0));
    let workers = Arc::new(Workers::start(num_workers, capacity, Arc::clone(&active)));

    println!(
        "Tasks: {}  capacity: {}  workers: {}",
        num_tasks, capacity, num_workers
    );

    let start = Instant::now();
    for i in 0..num_tasks {
        let workers = Arc::clone(&workers);
        let active = Arc::clone(&active);
        let peak = Arc::clone(&peak);
        let completed = Arc::clone(&completed);
        let checksum = Arc::clone(&checksum);

        pool.enqueue(
            move |n, done| {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                workers.submit((n, done));
            },
            move |value| {
                checksum.fetch_xor(value, Ordering::Relaxed);
                completed.fetch_add(1, Ordering::Relaxed);
            },
            i as u64,
        );

        if (i + 1) % 10_000 == 0 {
            print!("\rEnqueued: {}/{}", i + 1, num_tasks);
        }
    }
    let enqueue_time = start.elapsed();
    println!("\n\nEnqueue time: {:?}", enqueue_time);

    if !pool.wait_idle_timeout(Duration::from_secs(60)) {
        println!("Timeout! {}", pool.stats());
    }
    let total_time = start.elapsed();

    let stats = pool.stats();
    kinfo!("final: {}", stats);

    println!("\n=== Results ===");
    println!("Tasks:          {}", num_tasks);
    println!("Completed:      {}", completed.load(Ordering::Relaxed));
    println!("Peak running:   {} (capacity {})", peak.load(Ordering::SeqCst), capacity);
    println!("Checksum:       {:#018x}", checksum.load(Ordering::Relaxed));
    println!("Total time:     {:?}", total_time);
    println!(
        "Throughput:     {:.0} tasks/sec",
        num_tasks as f64 / total_time.as_secs_f64()
    );
    println!("Stats:          {}", stats);

    // Actions still hold clones until the pool drops its items
    drop(pool);
    match Arc::try_unwrap(workers) {
        Ok(workers) => workers.stop(),
        Err(_) => kwarn!("workers still referenced, leaving them to exit with the process"),
    }

    if peak.load(Ordering::SeqCst) > capacity {
        eprintln!("FAIL: observed {} running with capacity {}", peak.load(Ordering::SeqCst), capacity);
        std::process::exit(1);
    }
    println!("\n=== Stress Test Complete ===");
}
