//! Timed MPMC relay: ring buffer vs mutex baseline.
//!
//! Spawns producers and consumers against each queue for a fixed wall
//! clock interval and prints successful operations per second.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spanq::constants::DEFAULT_RING_CAPACITY;
use spanq::{cpu_relax, MutexQueue, Queue, RingBuffer, TraceSpan};

const PRODUCERS: usize = 4;
const CONSUMERS: usize = 4;
const RUN_SECS: u64 = 4;

fn run_timed<Q>(label: &str, queue: Arc<Q>)
where
    Q: Queue<TraceSpan> + 'static,
{
    let stop = Arc::new(AtomicBool::new(false));
    let enqueued = Arc::new(AtomicU64::new(0));
    let dequeued = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let producer_handles: Vec<_> = (0..PRODUCERS)
        .map(|i| {
            let queue = queue.clone();
            let stop = stop.clone();
            let enqueued = enqueued.clone();
            thread::spawn(move || {
                let mut sequence = 0u64;
                let mut sent = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    let span = TraceSpan {
                        parent_id: i as u64 + 1,
                        span_id: sequence,
                        ..TraceSpan::default()
                    };
                    if queue.try_enqueue(span) {
                        sequence += 1;
                        sent += 1;
                    } else {
                        cpu_relax();
                    }
                }
                enqueued.fetch_add(sent, Ordering::Relaxed);
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let queue = queue.clone();
            let stop = stop.clone();
            let dequeued = dequeued.clone();
            thread::spawn(move || {
                let mut out = TraceSpan::default();
                let mut received = 0u64;
                loop {
                    if queue.try_dequeue(&mut out) {
                        received += 1;
                    } else if stop.load(Ordering::Relaxed) {
                        break;
                    } else {
                        cpu_relax();
                    }
                }
                dequeued.fetch_add(received, Ordering::Relaxed);
            })
        })
        .collect();

    thread::sleep(Duration::from_secs(RUN_SECS));
    stop.store(true, Ordering::Relaxed);

    for handle in producer_handles {
        handle.join().unwrap();
    }
    for handle in consumer_handles {
        handle.join().unwrap();
    }

    let elapsed = start.elapsed().as_secs_f64();
    let enqueued = enqueued.load(Ordering::Relaxed);
    let dequeued = dequeued.load(Ordering::Relaxed);
    let residual = enqueued - dequeued;

    println!(
        "[{}] {:.2}s | enqueued: {} | dequeued: {} | residual: {} | {:.2} M ops/sec",
        label,
        elapsed,
        enqueued,
        dequeued,
        residual,
        dequeued as f64 / elapsed / 1_000_000.0
    );
    assert!(residual as usize <= queue.capacity());
}

fn main() {
    println!(
        "span relay: {} producers, {} consumers, {}s per queue, capacity {}\n",
        PRODUCERS, CONSUMERS, RUN_SECS, DEFAULT_RING_CAPACITY
    );

    let ring = Arc::new(RingBuffer::<TraceSpan>::with_capacity(DEFAULT_RING_CAPACITY).unwrap());
    run_timed("ring ", ring);

    let mutex = Arc::new(MutexQueue::<TraceSpan>::with_capacity(DEFAULT_RING_CAPACITY).unwrap());
    run_timed("mutex", mutex);
}
