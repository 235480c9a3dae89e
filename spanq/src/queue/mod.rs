//! Bounded FIFO queue components sharing one non-blocking surface.
//!
//! ## Implementations
//!
//! | Type | Coordination | Use case |
//! |------|--------------|----------|
//! | [`RingBuffer<T>`] | Lock-free sequenced slots | MPMC fast path |
//! | [`MutexQueue<T>`] | Mutex + condition variables | Semantic baseline |
//!
//! Drivers program against the [`Queue`] trait so the two can be swapped
//! under identical thread counts and capacities.

pub mod mutex_queue;
pub mod ring;

pub use mutex_queue::MutexQueue;
pub use ring::RingBuffer;

/// Payload contract for queue values.
///
/// Anything trivially copyable qualifies: the queues move values by
/// bitwise copy, so a dequeued value is always bit-for-bit identical to
/// the enqueued original. Blanket-implemented; there is nothing to write
/// by hand.
pub trait QueueEntry: Copy + Default + Send + 'static {}

impl<T: Copy + Default + Send + 'static> QueueEntry for T {}

/// The uniform non-blocking surface of both queue components.
///
/// Full and empty are transient state observations, reported as `false`;
/// the caller owns the retry policy. Implementations must be safe under
/// concurrent calls from any number of producers and consumers.
pub trait Queue<T: QueueEntry>: Send + Sync {
    /// Copy `value` into the next available slot. Returns `false` when
    /// the queue is observed full. Never blocks.
    fn try_enqueue(&self, value: T) -> bool;

    /// Copy the next available payload into `out`. Returns `false` when
    /// the queue is observed empty, leaving `out` unmodified. Never
    /// blocks.
    fn try_dequeue(&self, out: &mut T) -> bool;

    /// The fixed capacity.
    fn capacity(&self) -> usize;
}
