//! Execution parameters: use case loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the
//! retry loop in
//! [`AgentResponseOrchestrator`](crate::use_cases::process_model_response::AgentResponseOrchestrator)
//! and the pre-commit delay of the chat answer update. These are
//! application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Retries after the first attempt, used when a caller does not pass its own budget.
    pub max_retries: u32,
    /// Backoff base: attempt `i` waits `retry_base_delay * 2^i` before attempt `i + 1`.
    pub retry_base_delay: Duration,
    /// Upper bound of the random delay before a chat answer update commit.
    /// Zero disables the delay.
    pub answer_jitter_max: Duration,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_base_delay: Duration::from_millis(1000),
            answer_jitter_max: Duration::from_millis(2000),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn with_answer_jitter_max(mut self, max: Duration) -> Self {
        self.answer_jitter_max = max;
        self
    }
}
