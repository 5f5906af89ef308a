//! Provider adapter port
//!
//! Defines the interface for calling a model-serving backend.

use async_trait::async_trait;
use delib_domain::{ApiType, ModelCallRequest, ModelResponse};
use thiserror::Error;

/// Unexpected adapter failures.
///
/// Expected outcomes (bad credential, outage, malformed reply) are reported
/// as a non-OK [`ModelResponse`] instead. Anything surfacing here is turned
/// into `UNKNOWN_ERROR` by the orchestrator.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// One model-serving backend (Gemini, OpenAI-compatible, Ollama, ...)
///
/// Adapters translate the common request into their own wire schema and
/// must not write audit entries themselves.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Provider selector this adapter answers to
    fn api_type(&self) -> ApiType;

    /// Perform one call; no retries
    async fn send(&self, request: &ModelCallRequest) -> Result<ModelResponse, AdapterError>;
}
