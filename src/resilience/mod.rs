//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the statistics peer:
//!     → peer/transport.rs (per-attempt timeout)
//!     → On failure: retries.rs (classify, decide, pick delay)
//!     → backoff.rs (exponential delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound call has a deadline
//! - Only transient failures are retried
//! - Policy is data + pure functions so it is testable without a network

pub mod backoff;
pub mod retries;

pub use retries::{is_retryable, RetryPolicy, Retryable};
