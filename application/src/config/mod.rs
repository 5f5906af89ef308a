//! Application-level configuration.
//!
//! - [`ExecutionParams`]: retry budget, backoff base and commit jitter

pub mod execution_params;

pub use execution_params::ExecutionParams;
