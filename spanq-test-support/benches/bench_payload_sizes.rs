//! Payload size sweep: ring vs mutex baseline from 128 B to 16 KiB.
//!
//! Fixed event counts per size so criterion can report elements per
//! second; the mutex baseline runs under identical thread counts and
//! capacity.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use spanq::{cpu_relax, MutexQueue, Queue, RingBuffer};
use spanq_test_support::payloads::{Payload128, Payload16K, Payload1K, Payload4K, Payload8K};
use spanq_test_support::Tagged;

const SWEEP_CAPACITY: usize = 4096;
const PRODUCERS: usize = 2;
const CONSUMERS: usize = 2;

/// Drive `events` tagged payloads through `queue` and return the count
/// received.
fn run_mpmc<Q, T>(queue: Arc<Q>, events: u64) -> u64
where
    Q: Queue<T> + 'static,
    T: Tagged,
{
    let per_producer = events / PRODUCERS as u64;
    let total = per_producer * PRODUCERS as u64;
    let received = Arc::new(AtomicU64::new(0));

    let consumer_handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();
            let received = received.clone();
            thread::spawn(move || {
                let mut out = T::default();
                loop {
                    if queue.try_dequeue(&mut out) {
                        std::hint::black_box(out.sequence());
                        received.fetch_add(1, Ordering::Relaxed);
                    } else {
                        if received.load(Ordering::Relaxed) >= total {
                            break;
                        }
                        cpu_relax();
                    }
                }
            })
        })
        .collect();

    let producer_handles: Vec<_> = (0..PRODUCERS)
        .map(|i| {
            let queue = queue.clone();
            thread::spawn(move || {
                let producer_id = i as u64 + 1;
                for sequence in 0..per_producer {
                    while !queue.try_enqueue(T::tagged(producer_id, sequence)) {
                        cpu_relax();
                    }
                }
            })
        })
        .collect();

    for handle in producer_handles {
        handle.join().unwrap();
    }
    for handle in consumer_handles {
        handle.join().unwrap();
    }

    received.load(Ordering::Relaxed)
}

fn bench_size<T: Tagged>(group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>, label: &str, events: u64) {
    group.throughput(Throughput::Elements(events));

    group.bench_function(BenchmarkId::new("ring", label), |b| {
        b.iter(|| {
            let ring = Arc::new(RingBuffer::<T>::with_capacity(SWEEP_CAPACITY).unwrap());
            run_mpmc(ring, events)
        })
    });

    group.bench_function(BenchmarkId::new("mutex", label), |b| {
        b.iter(|| {
            let queue = Arc::new(MutexQueue::<T>::with_capacity(SWEEP_CAPACITY).unwrap());
            run_mpmc(queue, events)
        })
    });
}

fn bench_payload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_size_sweep");
    group.sample_size(10);

    bench_size::<Payload128>(&mut group, "128B", 1_000_000);
    bench_size::<Payload1K>(&mut group, "1KiB", 500_000);
    bench_size::<Payload4K>(&mut group, "4KiB", 200_000);
    bench_size::<Payload8K>(&mut group, "8KiB", 100_000);
    bench_size::<Payload16K>(&mut group, "16KiB", 50_000);

    group.finish();
}

criterion_group!(benches, bench_payload_sizes);
criterion_main!(benches);
