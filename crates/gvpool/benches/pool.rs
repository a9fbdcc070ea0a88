//! Pool overhead benchmarks
//!
//! - `sync_complete`: enqueue + admit + complete on one thread, no backlog
//! - `backlog_drain`: fill the backlog behind a held slot, then release it
//! - `threaded`: completions arrive from worker threads

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gvpool::{Done, Pool};
use std::sync::{Arc, Mutex};
use std::thread;

fn sync_complete(c: &mut Criterion) {
    let pool: Pool<u64, u64> = Pool::new(1).expect("capacity 1 is valid");

    c.bench_function("sync_complete", |b| {
        b.iter(|| {
            pool.enqueue(|n, done| done.complete(n), |v| { black_box(v); }, black_box(7));
        })
    });
}

fn backlog_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("backlog_drain");

    for &depth in &[16usize, 256, 4096] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let pool: Pool<usize, usize> = Pool::new(1).expect("capacity 1 is valid");
                let held: Arc<Mutex<Option<Done<usize>>>> = Arc::new(Mutex::new(None));

                let slot = Arc::clone(&held);
                pool.enqueue(move |_, done| *slot.lock().unwrap() = Some(done), |_| {}, 0);
                for i in 0..depth {
                    pool.enqueue(|n, done| done.complete(n), |v| { black_box(v); }, i);
                }

                let done = held.lock().unwrap().take();
                if let Some(done) = done {
                    done.complete(0);
                }
                assert!(pool.is_idle());
            })
        });
    }
    group.finish();
}

fn threaded(c: &mut Criterion) {
    let mut group = c.benchmark_group("threaded");
    group.sample_size(20);

    for &capacity in &[1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, &capacity| {
            b.iter(|| {
                let pool: Pool<usize, usize> = Pool::new(capacity).expect("capacity is positive");
                for i in 0..64 {
                    pool.enqueue(
                        |n, done| {
                            thread::spawn(move || done.complete(n));
                        },
                        |v| { black_box(v); },
                        i,
                    );
                }
                pool.wait_idle();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, sync_complete, backlog_drain, threaded);
criterion_main!(benches);
