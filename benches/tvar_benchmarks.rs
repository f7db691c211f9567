//! Transactional Memory Benchmarks
//!
//! Measures baseline performance of the T-Var subsystem:
//! - Single-slot optimistic commit latency
//! - Contended increment throughput across two threads
//! - Bulk-lock acquisition over a two-slot set

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

// Layer 1: Standard library imports
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use criterion::{criterion_group, criterion_main, Criterion};

// Layer 3: Internal module imports
use ractor_rt::tvar::Space;
use ractor_rt::value::RValue;

/// Benchmark: a single uncontended `atomically` commit.
fn atomically_single_commit(c: &mut Criterion) {
    let space = Space::new();
    let slot = space.new_tvar(RValue::Int(0));

    c.bench_function("atomically_single_commit", |b| {
        b.iter(|| {
            space
                .atomically(|tx| {
                    let current = match tx.read(&slot) {
                        RValue::Int(n) => n,
                        _ => unreachable!(),
                    };
                    tx.write(&slot, RValue::Int(current + 1));
                    Ok(())
                })
                .unwrap();
        });
    });

    black_box(slot.peek());
}

/// Benchmark: two threads each committing 100 increments to a shared slot.
fn atomically_contended_increment(c: &mut Criterion) {
    c.bench_function("atomically_contended_increment_100x2", |b| {
        b.iter(|| {
            let space = Arc::new(Space::new());
            let slot = space.new_tvar(RValue::Int(0));

            let run = |space: Arc<Space>, slot: ractor_rt::tvar::Slot| {
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        space
                            .atomically(|tx| {
                                let current = match tx.read(&slot) {
                                    RValue::Int(n) => n,
                                    _ => unreachable!(),
                                };
                                tx.write(&slot, RValue::Int(current + 1));
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            };

            let t1 = run(Arc::clone(&space), slot.clone());
            let t2 = run(Arc::clone(&space), slot.clone());
            t1.join().unwrap();
            t2.join().unwrap();
        });
    });
}

/// Benchmark: bulk-lock acquisition and release over two slots.
fn lock_all_two_slots(c: &mut Criterion) {
    let space = Space::new();
    let t1 = space.new_tvar(RValue::Int(0));
    let t2 = space.new_tvar(RValue::Int(0));

    c.bench_function("lock_all_two_slots", |b| {
        b.iter(|| {
            space.lock_all(&[t1.clone(), t2.clone()], |locked| {
                let a = match locked.get(&t1).unwrap() {
                    RValue::Int(n) => n,
                    _ => unreachable!(),
                };
                locked.set(&t1, RValue::Int(a + 1)).unwrap();
            });
        });
    });
}

/// Configure criterion for resource-conscious benchmarking.
fn configure_criterion() -> Criterion {
    Criterion::default()
        .sample_size(30)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(2))
        .without_plots()
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets =
        atomically_single_commit,
        atomically_contended_increment,
        lock_all_two_slots,
}

criterion_main!(benches);
