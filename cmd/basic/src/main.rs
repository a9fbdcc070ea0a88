//! Basic gvpool example
//!
//! Five simulated downloads through a pool of capacity 2. Each download
//! runs on its own OS thread; the pool decides when it may start.
//!
//! # Environment Variables
//!
//! - `GVPOOL_CAPACITY=<n>` - Override the pool capacity (default here: 2)
//! - `GVPOOL_LOG_LEVEL=trace` - Show every admit/complete
//! - `GVPOOL_LOG_TIME=1` - Prefix log lines with elapsed milliseconds

use gvpool::{env_get, kinfo, Pool, PoolConfig};
use std::thread;
use std::time::{Duration, Instant};

/// (name, simulated latency in ms)
type Download = (&'static str, u64);

// GVPOOL_LOG_LEVEL=trace GVPOOL_LOG_TIME=1 cargo run -p gvpool-basic
fn main() {
    println!("=== gvpool Basic Example ===\n");

    let capacity: usize = env_get("GVPOOL_CAPACITY", 2);
    let config = PoolConfig::new().capacity(capacity).name("downloads");

    let pool: Pool<Download, (&'static str, usize)> = match Pool::with_config(config) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("cannot create pool: {}", e);
            std::process::exit(2);
        }
    };

    let start = Instant::now();
    let downloads: [Download; 5] = [
        ("alpha.tar", 300),
        ("beta.tar", 100),
        ("gamma.tar", 200),
        ("delta.tar", 50),
        ("epsilon.tar", 150),
    ];

    for download in downloads {
        pool.enqueue(
            |(name, latency_ms), done| {
                kinfo!("start {} (latency {}ms)", name, latency_ms);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(latency_ms));
                    done.complete((name, name.len() * 1024));
                });
            },
            move |(name, bytes)| {
                println!(
                    "[{:>5}ms] finished {:<12} {} bytes",
                    start.elapsed().as_millis(),
                    name,
                    bytes
                );
            },
            download,
        );
    }

    println!("Queued {} downloads: {}\n", downloads.len(), pool.stats());

    // A late entry can still be pruned while it waits
    pool.enqueue(|_, done| done.complete(("zeta.tar", 0)), |_| {}, ("zeta.tar", 0));
    pool.remove(-1, 1);

    pool.wait_idle();
    println!("\nAll done in {:?}: {}", start.elapsed(), pool.stats());
    println!("\n=== Example Complete ===");
}
