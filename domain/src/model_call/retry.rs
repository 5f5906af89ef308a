//! Retry classification and backoff for provider calls

use super::ModelResponseStatus;
use std::time::Duration;

/// Stateless retry policy: exponential backoff without jitter.
///
/// `Copy` and free of interior state, so one instance can be shared by any
/// number of concurrent orchestrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Retry only transient failures, and only while budget remains.
    pub fn should_retry(&self, status: ModelResponseStatus, attempt: u32, max_retries: u32) -> bool {
        attempt < max_retries && status.is_transient()
    }

    /// `base_delay * 2^attempt`, saturating instead of overflowing
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BASE_DELAY)
    }
}
