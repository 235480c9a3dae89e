//! Timed MPMC stress harness with conservation metrics.
//!
//! Spawns N producers and M consumers against a shared queue. Producers
//! enqueue tagged payloads until a timer sets the stop flag; consumers
//! drain until every producer has finished and the queue reads empty.
//! Each side keeps a count and a checksum so the caller can verify that
//! the multiset of dequeued payloads equals the multiset of enqueued
//! ones.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use spanq::cpu::pin_to_cpu;
use spanq::{cpu_relax, Queue, QueueEntry, TraceSpan};

/// Payloads that carry an origin tag and a per-producer sequence number,
/// so a stress run can be verified after the fact.
pub trait Tagged: QueueEntry {
    /// Build a payload tagged with its producer and sequence number
    fn tagged(producer_id: u64, sequence: u64) -> Self;

    /// The producer tag this payload carries
    fn producer_id(&self) -> u64;

    /// The per-producer sequence number this payload carries
    fn sequence(&self) -> u64;
}

impl Tagged for TraceSpan {
    fn tagged(producer_id: u64, sequence: u64) -> Self {
        Self {
            parent_id: producer_id,
            span_id: sequence,
            ..Self::default()
        }
    }

    fn producer_id(&self) -> u64 {
        self.parent_id
    }

    fn sequence(&self) -> u64 {
        self.span_id
    }
}

/// Configuration for a timed stress run
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// How long producers keep enqueuing
    pub duration: Duration,
    /// Number of producer threads
    pub producers: usize,
    /// Number of consumer threads
    pub consumers: usize,
    /// Pin worker threads round-robin to cores for steadier numbers
    pub pin_threads: bool,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(4),
            producers: 4,
            consumers: 4,
            pin_threads: false,
        }
    }
}

impl StressConfig {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn with_producers(mut self, n: usize) -> Self {
        self.producers = n;
        self
    }

    pub fn with_consumers(mut self, n: usize) -> Self {
        self.consumers = n;
        self
    }

    pub fn with_pinned_threads(mut self, pin: bool) -> Self {
        self.pin_threads = pin;
        self
    }
}

/// Counters collected by a stress run
#[derive(Debug, Clone)]
pub struct StressMetrics {
    /// Successful enqueues across all producers
    pub enqueued: u64,
    /// Successful dequeues across all consumers
    pub dequeued: u64,
    /// Wrapping checksum over every enqueued (producer, sequence) tag
    pub enqueue_checksum: u64,
    /// Wrapping checksum over every dequeued (producer, sequence) tag
    pub dequeue_checksum: u64,
    /// Wall-clock time including the final drain
    pub elapsed: Duration,
}

impl StressMetrics {
    /// Multiset equality of what went in and what came out
    pub fn is_conserved(&self) -> bool {
        self.enqueued == self.dequeued && self.enqueue_checksum == self.dequeue_checksum
    }

    /// Successful enqueues per second
    pub fn enqueue_rate(&self) -> f64 {
        self.enqueued as f64 / self.elapsed.as_secs_f64()
    }

    /// Successful dequeues per second
    pub fn dequeue_rate(&self) -> f64 {
        self.dequeued as f64 / self.elapsed.as_secs_f64()
    }

    /// One-line summary for test output
    pub fn report(&self, label: &str) {
        println!(
            "[{}] enqueued: {} | dequeued: {} | {:.2} M ops/sec",
            label,
            self.enqueued,
            self.dequeued,
            self.dequeue_rate() / 1_000_000.0
        );
    }
}

fn checksum(producer_id: u64, sequence: u64) -> u64 {
    producer_id
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(sequence)
}

/// Run a timed MPMC stress pass over `queue`.
///
/// Producers tag payloads with 1-based producer ids and dense sequence
/// numbers, retrying with the spin hint on a full queue. After the stop
/// flag fires, consumers keep draining until the last producer has
/// finished and the queue reads empty, so a conserved run always ends
/// with `enqueued == dequeued`.
pub fn run_mpmc<Q, T>(queue: &Arc<Q>, config: &StressConfig) -> StressMetrics
where
    Q: Queue<T> + 'static,
    T: Tagged,
{
    let stop = Arc::new(AtomicBool::new(false));
    let producers_done = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let producer_handles: Vec<_> = (0..config.producers)
        .map(|i| {
            let queue = queue.clone();
            let stop = stop.clone();
            let producers_done = producers_done.clone();
            let pin = config.pin_threads;
            thread::spawn(move || {
                if pin {
                    // Best effort; shared runners often refuse affinity.
                    let _ = pin_to_cpu(i);
                }
                let producer_id = i as u64 + 1;
                let mut sequence = 0u64;
                let mut sum = 0u64;
                while !stop.load(Ordering::Relaxed) {
                    if queue.try_enqueue(T::tagged(producer_id, sequence)) {
                        sum = sum.wrapping_add(checksum(producer_id, sequence));
                        sequence += 1;
                    } else {
                        cpu_relax();
                    }
                }
                producers_done.fetch_add(1, Ordering::Release);
                (sequence, sum)
            })
        })
        .collect();

    let consumer_handles: Vec<_> = (0..config.consumers)
        .map(|i| {
            let queue = queue.clone();
            let producers_done = producers_done.clone();
            let producers = config.producers as u64;
            let pin = config.pin_threads;
            let pin_offset = config.producers;
            thread::spawn(move || {
                if pin {
                    let _ = pin_to_cpu(pin_offset + i);
                }
                let mut count = 0u64;
                let mut sum = 0u64;
                let mut out = T::default();
                loop {
                    if queue.try_dequeue(&mut out) {
                        sum = sum.wrapping_add(checksum(out.producer_id(), out.sequence()));
                        count += 1;
                    } else if producers_done.load(Ordering::Acquire) == producers {
                        // Every producer has finished: anything still
                        // queued was published before that, so one last
                        // drain empties the queue for good.
                        while queue.try_dequeue(&mut out) {
                            sum = sum.wrapping_add(checksum(out.producer_id(), out.sequence()));
                            count += 1;
                        }
                        break;
                    } else {
                        cpu_relax();
                    }
                }
                (count, sum)
            })
        })
        .collect();

    thread::sleep(config.duration);
    stop.store(true, Ordering::Relaxed);

    let mut enqueued = 0u64;
    let mut enqueue_checksum = 0u64;
    for handle in producer_handles {
        let (count, sum) = handle.join().unwrap();
        enqueued += count;
        enqueue_checksum = enqueue_checksum.wrapping_add(sum);
    }

    let mut dequeued = 0u64;
    let mut dequeue_checksum = 0u64;
    for handle in consumer_handles {
        let (count, sum) = handle.join().unwrap();
        dequeued += count;
        dequeue_checksum = dequeue_checksum.wrapping_add(sum);
    }

    StressMetrics {
        enqueued,
        dequeued,
        enqueue_checksum,
        dequeue_checksum,
        elapsed: start.elapsed(),
    }
}
