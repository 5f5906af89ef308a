//! Model provider adapters
//!
//! One [`ProviderAdapter`] per supported provider. The orchestrator routes a
//! request to the adapter whose [`api_type`](ProviderAdapter::api_type)
//! matches the request's model settings.

pub mod gemini;
pub mod http;
pub mod ollama;
pub mod openai;

pub use gemini::GeminiAdapter;
pub use ollama::OllamaAdapter;
pub use openai::OpenAiAdapter;

use crate::config::FileProvidersConfig;
use delib_application::ProviderAdapter;
use std::sync::Arc;
use std::time::Duration;

/// Build every adapter on one shared HTTP client.
pub fn build_adapters(
    config: &FileProvidersConfig,
) -> Result<Vec<Arc<dyn ProviderAdapter>>, reqwest::Error> {
    let client = http::build_client(Duration::from_secs(config.timeout_secs))?;

    Ok(vec![
        Arc::new(GeminiAdapter::with_base_url(
            client.clone(),
            &config.gemini.base_url,
        )),
        Arc::new(OpenAiAdapter::with_default_base_url(
            client.clone(),
            &config.openai.base_url,
        )),
        Arc::new(OllamaAdapter::new(client)),
    ])
}
