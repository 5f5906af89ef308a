//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is optional; missing fields take their defaults.

mod providers;
mod runtime;

pub use providers::{FileGeminiConfig, FileOllamaConfig, FileOpenAiConfig, FileProvidersConfig};
pub use runtime::{FileChatConfig, FileLoggingConfig, FileOrchestrationConfig, FileStoreConfig};

use delib_application::ExecutionParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("orchestration.base_delay_ms cannot be 0")]
    ZeroBaseDelay,

    #[error("providers.ollama.url cannot be empty")]
    EmptyOllamaUrl,

    #[error("providers.timeout_secs cannot be 0")]
    ZeroTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Model call retry settings
    pub orchestration: FileOrchestrationConfig,
    /// Chat stage settings
    pub chat: FileChatConfig,
    /// Document store persistence
    pub store: FileStoreConfig,
    /// Audit and diagnostic logging
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.orchestration.base_delay_ms == 0 {
            return Err(ConfigValidationError::ZeroBaseDelay);
        }
        if self.providers.ollama.url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyOllamaUrl);
        }
        if self.providers.timeout_secs == 0 {
            return Err(ConfigValidationError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_retries(self.orchestration.max_retries)
            .with_retry_base_delay(Duration::from_millis(self.orchestration.base_delay_ms))
            .with_answer_jitter_max(Duration::from_millis(self.chat.answer_jitter_max_ms))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[providers]
timeout_secs = 30

[providers.gemini]
api_key_env = "GOOGLE_KEY"

[orchestration]
max_retries = 3
base_delay_ms = 250

[chat]
answer_jitter_max_ms = 0

[store]
path = "data/store.json"

[logging]
model_log_path = "logs/model-calls.jsonl"
log_to_store = false
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.providers.timeout_secs, 30);
        assert_eq!(config.providers.gemini.api_key_env, "GOOGLE_KEY");
        assert_eq!(config.orchestration.max_retries, 3);
        assert_eq!(config.chat.answer_jitter_max_ms, 0);
        assert_eq!(config.store.path.unwrap().to_str(), Some("data/store.json"));
        assert!(!config.logging.log_to_store);
        assert!(config.logging.diagnostics_dir.is_none());
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.logging.log_to_store);
        assert_eq!(config.orchestration.base_delay_ms, 1000);
    }

    #[test]
    fn test_validate_rejects_zero_delay_and_empty_url() {
        let mut config = FileConfig::default();
        config.orchestration.base_delay_ms = 0;
        assert_eq!(config.validate(), Err(ConfigValidationError::ZeroBaseDelay));

        let mut config = FileConfig::default();
        config.providers.ollama.url = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigValidationError::EmptyOllamaUrl));
    }

    #[test]
    fn test_execution_params_conversion() {
        let mut config = FileConfig::default();
        config.orchestration.max_retries = 2;
        config.chat.answer_jitter_max_ms = 0;

        let params = config.execution_params();

        assert_eq!(params.max_retries, 2);
        assert_eq!(params.retry_base_delay, Duration::from_millis(1000));
        assert_eq!(params.answer_jitter_max, Duration::ZERO);
    }
}
