//! Per-provider credential bundle

use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenAI-compatible endpoint credentials
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenAiServerConfig {
    pub api_key: String,
    /// Overrides the adapter's default endpoint (e.g. a self-hosted gateway)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Ollama server location
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OllamaServerConfig {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Read-only credentials for every provider, shared across calls
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKeyConfig {
    pub gemini_api_key: String,
    #[serde(rename = "openAIApiKey", skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<OpenAiServerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_api_key: Option<OllamaServerConfig>,
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "<redacted>" }
}

impl fmt::Debug for OpenAiServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiServerConfig")
            .field("api_key", &redact(&self.api_key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Debug for OllamaServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaServerConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_deref().map(redact))
            .finish()
    }
}

impl fmt::Debug for ApiKeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyConfig")
            .field("gemini_api_key", &redact(&self.gemini_api_key))
            .field("openai_api_key", &self.openai_api_key)
            .field("ollama_api_key", &self.ollama_api_key)
            .finish()
    }
}
