//! Clock port
//!
//! Time source and timed suspension, injected so the retry loop and the
//! commit jitter can be tested without real waiting.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the calling task only; other tasks keep running.
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `tokio::time`
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
