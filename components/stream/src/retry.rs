//! When and how long to wait before reopening a stream.
//!
//! A request that fails before the server accepted it is reopened after an
//! exponentially growing pause. A random share of up to a quarter of the
//! pause is added so that clients which failed together do not come back
//! together.

use std::time::{Duration, SystemTime};

use crate::error::StreamError;

/// Default number of reopen attempts after the first one
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default pause before the first reopen (in milliseconds)
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;
/// Default ceiling on a single pause, before jitter (in milliseconds)
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;

/// Policy for reopening a stream that failed to open.
///
/// Only opening is covered. Once events have been delivered a failure ends
/// the stream, because replaying would duplicate text the caller has
/// already shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Reopen attempts after the first request
    pub max_retries: u32,
    /// Pause before the first reopen; doubled for each one after it
    pub base_delay: Duration,
    /// Ceiling on a single pause, before jitter
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Three reopens, starting at one second and capped at thirty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }

    /// A single request, never reopened.
    #[must_use]
    pub const fn none() -> Self {
        Self::new().with_max_retries(0)
    }

    /// Sets how many times a failed open is repeated.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the pause before the first reopen.
    #[must_use]
    pub const fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the ceiling on a single pause.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Whether the request that failed with `error` on attempt `attempt`
    /// (counting from zero) should be sent again.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &StreamError) -> bool {
        attempt < self.max_retries && error.is_retryable()
    }

    /// Pause to take after attempt `attempt` (counting from zero) failed.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let doubled = 1_u32
            .checked_shl(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(self.max_delay);
        let delay = doubled.min(self.max_delay);
        delay.saturating_add(jitter(delay))
    }
}

/// A pseudo-random share of up to a quarter of `delay`.
fn jitter(delay: Duration) -> Duration {
    let permille = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |since| since.subsec_nanos() % 1000);
    (delay / 4)
        .checked_mul(permille)
        .map_or(Duration::ZERO, |scaled| scaled / 1000)
}
