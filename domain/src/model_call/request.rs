//! Model call request and its audit context

use super::{ApiKeyConfig, ApiType, ModelGenerationConfig, Prompt, StructuredOutputConfig};
use serde::{Deserialize, Serialize};

/// Provider selector plus model name, as configured on an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentModelSettings {
    pub api_type: ApiType,
    pub model_name: String,
}

impl AgentModelSettings {
    pub fn new(api_type: ApiType, model_name: impl Into<String>) -> Self {
        Self {
            api_type,
            model_name: model_name.into(),
        }
    }
}

/// Everything a provider adapter needs for one call (immutable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCallRequest {
    pub model_settings: AgentModelSettings,
    pub prompt: Prompt,
    #[serde(default)]
    pub generation_config: ModelGenerationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_output: Option<StructuredOutputConfig>,
    #[serde(default)]
    pub credentials: ApiKeyConfig,
}

impl ModelCallRequest {
    pub fn new(model_settings: AgentModelSettings, prompt: impl Into<Prompt>) -> Self {
        Self {
            model_settings,
            prompt: prompt.into(),
            generation_config: ModelGenerationConfig::default(),
            structured_output: None,
            credentials: ApiKeyConfig::default(),
        }
    }

    pub fn with_generation_config(mut self, config: ModelGenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    pub fn with_structured_output(mut self, config: StructuredOutputConfig) -> Self {
        self.structured_output = Some(config);
        self
    }

    pub fn with_credentials(mut self, credentials: ApiKeyConfig) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn api_type(&self) -> &ApiType {
        &self.model_settings.api_type
    }

    pub fn model_name(&self) -> &str {
        &self.model_settings.model_name
    }

    /// Structured output settings, only when JSON output was actually requested
    pub fn active_structured_output(&self) -> Option<&StructuredOutputConfig> {
        self.structured_output.as_ref().filter(|c| c.is_active())
    }
}

/// Identifiers copied into every audit record of a call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelCallContext {
    pub experiment_id: String,
    pub cohort_id: String,
    pub participant_id: String,
    pub stage_id: String,
    pub public_id: String,
    pub private_id: String,
    pub description: String,
}

impl ModelCallContext {
    pub fn new(experiment_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_cohort(mut self, cohort_id: impl Into<String>) -> Self {
        self.cohort_id = cohort_id.into();
        self
    }

    pub fn with_participant(
        mut self,
        private_id: impl Into<String>,
        public_id: impl Into<String>,
    ) -> Self {
        self.private_id = private_id.into();
        self.participant_id = self.private_id.clone();
        self.public_id = public_id.into();
        self
    }

    pub fn with_stage(mut self, stage_id: impl Into<String>) -> Self {
        self.stage_id = stage_id.into();
        self
    }

    /// Description for the given attempt, annotated `(retry N)` after the first.
    pub fn attempt_description(&self, attempt: u32) -> String {
        if attempt > 0 {
            format!("{} (retry {attempt})", self.description)
        } else {
            self.description.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_call::StructuredOutputConfig;

    #[test]
    fn test_attempt_description() {
        let context = ModelCallContext::new("exp-1", "mediator reply");
        assert_eq!(context.attempt_description(0), "mediator reply");
        assert_eq!(context.attempt_description(2), "mediator reply (retry 2)");
    }

    #[test]
    fn test_inactive_structured_output_is_ignored() {
        let request = ModelCallRequest::new(AgentModelSettings::new(ApiType::Gemini, "m"), "hi")
            .with_structured_output(StructuredOutputConfig::default());
        assert!(request.active_structured_output().is_none());
    }

    #[test]
    fn test_request_decodes_with_defaults() {
        let request: ModelCallRequest = serde_json::from_str(
            r#"{"modelSettings":{"apiType":"OLLAMA","modelName":"llama3"},"prompt":"hello"}"#,
        )
        .unwrap();
        assert_eq!(request.api_type(), &ApiType::Ollama);
        assert_eq!(request.model_name(), "llama3");
        assert_eq!(request.generation_config.max_tokens, 300);
    }
}
