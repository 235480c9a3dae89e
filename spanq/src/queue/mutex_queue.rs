//! Mutually-excluded bounded FIFO, the semantic baseline for the ring.
//!
//! One mutex around a `VecDeque` plus two condition variables. The
//! non-blocking pair matches the ring's [`Queue`] contract; the blocking
//! pair waits on *not-full*/*not-empty* and exists only here, never on
//! the lock-free ring. Notification happens after the lock is released
//! so a woken thread never lands on a still-held mutex.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::error::{Result, SpanqError};
use crate::queue::{Queue, QueueEntry};

/// Bounded FIFO protected by a single mutex.
///
/// Exists to verify the lock-free ring's behavior and to quantify its
/// speedup against the simplest correct implementation of the shared
/// contract.
pub struct MutexQueue<T> {
    queue: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T: QueueEntry> MutexQueue<T> {
    /// Create a queue holding at most `capacity` payloads. Zero is
    /// rejected; unlike the ring, the capacity need not be a power of
    /// two.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SpanqError::config("Capacity must be greater than 0"));
        }

        Ok(Self {
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        })
    }

    /// The fixed capacity.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot of the number of queued payloads.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Snapshot emptiness check.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Append `value` if there is room. Returns `false` on a full queue
    /// without waiting.
    pub fn try_enqueue(&self, value: T) -> bool {
        let mut queue = self.queue.lock();
        if queue.len() == self.capacity {
            return false;
        }
        queue.push_back(value);
        drop(queue);

        self.not_empty.notify_one();
        true
    }

    /// Remove the front payload into `out` if one exists. Returns
    /// `false` on an empty queue without waiting; `out` is unmodified.
    pub fn try_dequeue(&self, out: &mut T) -> bool {
        let mut queue = self.queue.lock();
        match queue.pop_front() {
            Some(value) => {
                drop(queue);
                self.not_full.notify_one();
                *out = value;
                true
            }
            None => false,
        }
    }

    /// Append `value`, waiting on the *not-full* condition while the
    /// queue is at capacity.
    pub fn enqueue(&self, value: T) {
        let mut queue = self.queue.lock();
        while queue.len() == self.capacity {
            self.not_full.wait(&mut queue);
        }
        queue.push_back(value);
        drop(queue);

        self.not_empty.notify_one();
    }

    /// Remove and return the front payload, waiting on the *not-empty*
    /// condition while the queue is empty.
    pub fn dequeue(&self) -> T {
        let mut queue = self.queue.lock();
        loop {
            if let Some(value) = queue.pop_front() {
                drop(queue);
                self.not_full.notify_one();
                return value;
            }
            self.not_empty.wait(&mut queue);
        }
    }
}

impl<T: QueueEntry> Queue<T> for MutexQueue<T> {
    #[inline(always)]
    fn try_enqueue(&self, value: T) -> bool {
        MutexQueue::try_enqueue(self, value)
    }

    #[inline(always)]
    fn try_dequeue(&self, out: &mut T) -> bool {
        MutexQueue::try_dequeue(self, out)
    }

    #[inline(always)]
    fn capacity(&self) -> usize {
        MutexQueue::capacity(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::TraceSpan;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn rejects_zero_capacity() {
        assert!(MutexQueue::<u64>::with_capacity(0).is_err());
    }

    #[test]
    fn accepts_non_power_of_two_capacity() {
        let queue = MutexQueue::<u64>::with_capacity(100).unwrap();
        assert_eq!(queue.capacity(), 100);
    }

    #[test]
    fn try_pair_matches_ring_contract() {
        let queue = MutexQueue::<TraceSpan>::with_capacity(2).unwrap();
        let mut out = TraceSpan::default();

        assert!(!queue.try_dequeue(&mut out));
        assert!(queue.try_enqueue(TraceSpan::with_span_id(1)));
        assert!(queue.try_enqueue(TraceSpan::with_span_id(2)));
        assert!(!queue.try_enqueue(TraceSpan::with_span_id(3)));

        assert!(queue.try_dequeue(&mut out));
        assert_eq!(out.span_id, 1);
        assert!(queue.try_dequeue(&mut out));
        assert_eq!(out.span_id, 2);
        assert!(!queue.try_dequeue(&mut out));
    }

    #[test]
    fn single_threaded_fifo() {
        let queue = MutexQueue::<u64>::with_capacity(16).unwrap();

        for value in 0..16u64 {
            assert!(queue.try_enqueue(value));
        }
        for expected in 0..16u64 {
            let mut out = 0u64;
            assert!(queue.try_dequeue(&mut out));
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn blocking_pair_hands_off_through_a_tiny_queue() {
        const ITEMS: u64 = 1000;

        let queue = Arc::new(MutexQueue::<u64>::with_capacity(2).unwrap());

        let consumer_queue = queue.clone();
        let consumer = thread::spawn(move || {
            for expected in 0..ITEMS {
                assert_eq!(consumer_queue.dequeue(), expected);
            }
        });

        // Producer outpaces a capacity of 2 immediately, so both waits
        // are exercised.
        for value in 0..ITEMS {
            queue.enqueue(value);
        }

        consumer.join().unwrap();
        assert!(queue.is_empty());
    }
}
