//! Shared utilities for use cases.
//!
//! Random id generation and the randomized pre-commit delay.

use delib_domain::document_id_from;
use rand::Rng;
use std::time::Duration;

/// Fresh 20-character alphanumeric document id.
pub(crate) fn generate_document_id() -> String {
    let mut rng = rand::thread_rng();
    document_id_from(|| rng.r#gen::<u32>())
}

/// Uniformly random delay in `0..=max`, millisecond resolution.
pub(crate) fn random_delay(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}
