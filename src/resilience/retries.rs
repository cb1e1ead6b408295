//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failed attempt is worth repeating
//! - Map attempt numbers to backoff delays
//!
//! # Design Decisions
//! - Connection errors, timeouts and non-4xx failure statuses are retryable
//! - 4xx fails fast: resending the same request cannot succeed
//! - The policy is pure; the caller owns the loop and the sleeping

use std::time::Duration;

use axum::http::StatusCode;

use crate::config::PeerConfig;
use crate::resilience::backoff::calculate_backoff;

/// Classification hook for errors produced by a single attempt.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Whether a failed attempt that ended with `status` (or a network error) may be retried.
pub fn is_retryable(status: Option<StatusCode>, network_error: bool) -> bool {
    if network_error {
        return true;
    }
    matches!(status, Some(s) if !s.is_client_error() && !s.is_success())
}

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    pub fn from_config(config: &PeerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Total number of attempts including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before zero-based attempt `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms)
    }

    /// Sum of every backoff sleep when all retries are used.
    pub fn total_backoff(&self) -> Duration {
        // Past 64 doublings every delay sits at the cap.
        let uncapped = self.max_retries.min(64);
        let mut total = (1..=uncapped).fold(Duration::ZERO, |acc, k| acc.saturating_add(self.delay_for(k)));
        let capped = self.max_retries - uncapped;
        total = total.saturating_add(Duration::from_millis(self.max_delay_ms).saturating_mul(capped));
        total
    }

    /// Whether another attempt should follow `attempt` (zero-based) which failed with `error`.
    pub fn should_retry<E: Retryable>(&self, attempt: u32, error: &E) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&PeerConfig::default())
    }
}
