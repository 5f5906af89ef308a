//! OpenAI-compatible chat completions adapter

use super::http::{finish_text, send_json, trim_base};
use async_trait::async_trait;
use delib_application::{AdapterError, ProviderAdapter};
use delib_domain::{ApiType, ModelCallRequest, ModelResponse};
use reqwest::Client;
use serde_json::{Value, json};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

const PROVIDER: &str = "OpenAI";

/// Talks to `{base_url}/chat/completions`. The base URL comes from the
/// request credential when present, so any compatible server works.
pub struct OpenAiAdapter {
    client: Client,
    default_base_url: String,
}

impl OpenAiAdapter {
    pub fn new(client: Client) -> Self {
        Self::with_default_base_url(client, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_default_base_url(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            default_base_url: trim_base(base_url.as_ref()),
        }
    }
}

fn request_body(request: &ModelCallRequest) -> Value {
    let messages: Vec<Value> = request
        .prompt
        .to_messages()
        .into_iter()
        .map(|m| {
            let mut message = json!({ "role": m.role, "content": m.content });
            if let Some(name) = m.name {
                message["name"] = json!(name);
            }
            message
        })
        .collect();

    let generation = &request.generation_config;
    let mut body = json!({
        "model": request.model_name(),
        "messages": messages,
        "max_tokens": generation.max_tokens,
        "temperature": generation.temperature,
        "top_p": generation.top_p,
        "frequency_penalty": generation.frequency_penalty,
        "presence_penalty": generation.presence_penalty,
    });
    if !generation.stop_sequences.is_empty() {
        body["stop"] = json!(generation.stop_sequences);
    }
    if let Some(structured) = request.active_structured_output() {
        body["response_format"] = match structured.active_schema() {
            Some(schema) => json!({
                "type": "json_schema",
                "json_schema": { "name": "response", "schema": schema, "strict": true }
            }),
            None => json!({ "type": "json_object" }),
        };
    }
    generation.apply_custom_fields(&mut body);
    body
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn api_type(&self) -> ApiType {
        ApiType::OpenAi
    }

    async fn send(&self, request: &ModelCallRequest) -> Result<ModelResponse, AdapterError> {
        let Some(server) = request
            .credentials
            .openai_api_key
            .as_ref()
            .filter(|s| !s.api_key.trim().is_empty())
        else {
            return Ok(ModelResponse::config_error("OpenAI API key is not configured"));
        };

        let base = server
            .base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(trim_base)
            .unwrap_or_else(|| self.default_base_url.clone());

        let builder = self
            .client
            .post(format!("{base}/chat/completions"))
            .bearer_auth(server.api_key.trim())
            .json(&request_body(request));

        let reply = match send_json(PROVIDER, builder).await? {
            Ok(reply) => reply,
            Err(response) => return Ok(response),
        };

        let text = reply
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(finish_text(PROVIDER, request, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::http::build_client;
    use delib_domain::{
        AgentModelSettings, ApiKeyConfig, ModelResponseStatus, OpenAiServerConfig,
        StructuredOutputConfig,
    };
    use httpmock::prelude::*;
    use std::time::Duration;

    fn adapter() -> OpenAiAdapter {
        OpenAiAdapter::new(build_client(Duration::from_secs(5)).unwrap())
    }

    fn request(server: &MockServer) -> ModelCallRequest {
        ModelCallRequest::new(AgentModelSettings::new(ApiType::OpenAi, "gpt-4o-mini"), "Hello")
            .with_credentials(ApiKeyConfig {
                openai_api_key: Some(OpenAiServerConfig {
                    api_key: "sk-test".to_string(),
                    base_url: Some(format!("{}/v1/", server.base_url())),
                }),
                ..Default::default()
            })
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_chat_completion_success() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer sk-test")
                    .json_body_partial(
                        r#"{"model": "gpt-4o-mini", "messages": [{"role": "user", "content": "Hello"}], "max_tokens": 300}"#,
                    );
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(completion("Hi!"));
            })
            .await;

        let response = adapter().send(&request(&server)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, ModelResponseStatus::Ok);
        assert_eq!(response.text.as_deref(), Some("Hi!"));
    }

    #[tokio::test]
    async fn test_json_format_request_and_parse() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .json_body_partial(r#"{"response_format": {"type": "json_object"}}"#);
                then.status(200).json_body(completion(r#"{"vote": "A"}"#));
            })
            .await;

        let request = request(&server).with_structured_output(StructuredOutputConfig::json_format());
        let response = adapter().send(&request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.parsed_response, Some(json!({"vote": "A"})));
    }

    #[tokio::test]
    async fn test_missing_credential_is_config_error() {
        let request = ModelCallRequest::new(AgentModelSettings::new(ApiType::OpenAi, "m"), "Q");

        let response = adapter().send(&request).await.unwrap();

        assert_eq!(response.status, ModelResponseStatus::ConfigError);
    }

    #[tokio::test]
    async fn test_server_error_is_provider_unavailable() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(503).body("overloaded");
            })
            .await;

        let response = adapter().send(&request(&server)).await.unwrap();

        assert_eq!(response.status, ModelResponseStatus::ProviderUnavailableError);
    }

    #[tokio::test]
    async fn test_missing_content_is_internal_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let response = adapter().send(&request(&server)).await.unwrap();

        assert_eq!(response.status, ModelResponseStatus::InternalError);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_provider_unavailable() {
        let mut request = ModelCallRequest::new(AgentModelSettings::new(ApiType::OpenAi, "m"), "Q");
        request.credentials.openai_api_key = Some(OpenAiServerConfig {
            api_key: "sk".to_string(),
            base_url: Some("http://127.0.0.1:1".to_string()),
        });

        let response = adapter().send(&request).await.unwrap();

        assert_eq!(response.status, ModelResponseStatus::ProviderUnavailableError);
    }

    #[test]
    fn test_schema_response_format() {
        let server_less = ModelCallRequest::new(AgentModelSettings::new(ApiType::OpenAi, "m"), "Q")
            .with_structured_output(StructuredOutputConfig::json_schema(json!({"type": "object"})));

        let body = request_body(&server_less);

        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
    }
}
