//! Model response value object

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome classification of one provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelResponseStatus {
    /// No attempt has been made yet
    #[default]
    None,
    Ok,
    /// Bad or missing credential, unsupported provider, rejected request
    ConfigError,
    /// Network failure or provider-side outage
    ProviderUnavailableError,
    /// The provider answered with something unusable
    InternalError,
    /// An adapter failed in an unexpected way
    UnknownError,
}

impl ModelResponseStatus {
    /// Failures that may succeed when the same call is repeated
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            ModelResponseStatus::ProviderUnavailableError
                | ModelResponseStatus::InternalError
                | ModelResponseStatus::UnknownError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelResponseStatus::None => "none",
            ModelResponseStatus::Ok => "ok",
            ModelResponseStatus::ConfigError => "config_error",
            ModelResponseStatus::ProviderUnavailableError => "provider_unavailable_error",
            ModelResponseStatus::InternalError => "internal_error",
            ModelResponseStatus::UnknownError => "unknown_error",
        }
    }
}

impl std::fmt::Display for ModelResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a provider call. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    pub status: ModelResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ModelResponse {
    /// The "no attempt yet" sentinel
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            status: ModelResponseStatus::Ok,
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn ok_structured(text: impl Into<String>, parsed: Value) -> Self {
        Self {
            status: ModelResponseStatus::Ok,
            text: Some(text.into()),
            parsed_response: Some(parsed),
            error_message: None,
        }
    }

    pub fn error(status: ModelResponseStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            error_message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::error(ModelResponseStatus::ConfigError, message)
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::error(ModelResponseStatus::ProviderUnavailableError, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::error(ModelResponseStatus::InternalError, message)
    }

    pub fn unknown_error(message: impl Into<String>) -> Self {
        Self::error(ModelResponseStatus::UnknownError, message)
    }

    pub fn is_ok(&self) -> bool {
        self.status == ModelResponseStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_statuses() {
        assert!(ModelResponseStatus::ProviderUnavailableError.is_transient());
        assert!(ModelResponseStatus::InternalError.is_transient());
        assert!(ModelResponseStatus::UnknownError.is_transient());
        assert!(!ModelResponseStatus::ConfigError.is_transient());
        assert!(!ModelResponseStatus::Ok.is_transient());
        assert!(!ModelResponseStatus::None.is_transient());
    }

    #[test]
    fn test_default_is_none_sentinel() {
        let response = ModelResponse::none();
        assert_eq!(response.status, ModelResponseStatus::None);
        assert!(response.text.is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ModelResponse::provider_unavailable("503")).unwrap();
        assert_eq!(json["status"], "provider_unavailable_error");
        assert_eq!(json["errorMessage"], "503");
        assert!(json.get("text").is_none());
    }
}
