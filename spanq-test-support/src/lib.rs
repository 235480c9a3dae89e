//! # spanq-test-support
//!
//! Testing infrastructure for the spanq queues.
//!
//! ## Components
//!
//! - **StressRunner** (`run_mpmc`) - timed MPMC stress runs with
//!   conservation metrics, generic over any [`spanq::Queue`]
//! - **Tagged** - payload contract carrying an origin id and a
//!   per-producer sequence number for after-the-fact verification
//! - **payloads** - fixed-size payload types for size sweeps
//!
//! The long-running conservation and ordering tests live in this
//! member's `tests/` directory so the core crate's unit tests stay
//! fast.

pub mod payloads;
pub mod stress;

pub use stress::{run_mpmc, StressConfig, StressMetrics, Tagged};
