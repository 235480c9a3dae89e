//! Bounded MPMC queues for fixed-size payload transport.
//!
//! ## Components
//!
//! | Component | Type | Role |
//! |-----------|------|------|
//! | Lock-free ring | `RingBuffer<T>` | Vyukov sequenced-slot MPMC queue |
//! | Baseline | `MutexQueue<T>` | Mutex/condvar FIFO used as a reference |
//! | Spin hint | `cpu_relax()` | Pause hint for tight retry loops |
//! | Sample payload | `TraceSpan` | Cache-line aligned trace record |
//!
//! Both queues expose the same non-blocking surface through the [`Queue`]
//! trait (`try_enqueue`, `try_dequeue`, `capacity`), so drivers can swap
//! one for the other under identical thread counts and capacities. The
//! ring never blocks and never makes a system call on the fast path; the
//! baseline additionally offers a blocking `enqueue`/`dequeue` pair that
//! waits on condition variables.
//!
//! ## Payloads
//!
//! Any `Copy + Default + Send + 'static` value type can travel through the
//! queues (see [`QueueEntry`]). Dequeued values are bit-for-bit copies of
//! the enqueued originals.
//!
//! ## Retry policy
//!
//! `try_enqueue`/`try_dequeue` report observed full/empty as `false`.
//! Both observations are transient; callers that want to wait spin on the
//! call, typically interleaving [`cpu_relax`].

pub mod constants;
pub mod cpu;
pub mod error;
pub mod queue;
pub mod span;

pub use cpu::cpu_relax;
pub use error::{Result, SpanqError};
pub use queue::{MutexQueue, Queue, QueueEntry, RingBuffer};
pub use span::TraceSpan;
