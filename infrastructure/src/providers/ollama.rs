//! Ollama `/api/chat` adapter

use super::http::{finish_text, send_json, trim_base};
use async_trait::async_trait;
use delib_application::{AdapterError, ProviderAdapter};
use delib_domain::{ApiType, ModelCallRequest, ModelResponse};
use reqwest::Client;
use serde_json::{Value, json};

const PROVIDER: &str = "Ollama";

/// The server URL always comes from the request credential.
pub struct OllamaAdapter {
    client: Client,
}

impl OllamaAdapter {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn request_body(request: &ModelCallRequest) -> Value {
    let messages: Vec<Value> = request
        .prompt
        .to_messages()
        .into_iter()
        .map(|m| json!({ "role": m.role, "content": m.content }))
        .collect();

    let generation = &request.generation_config;
    let mut options = json!({
        "num_predict": generation.max_tokens,
        "temperature": generation.temperature,
        "top_p": generation.top_p,
        "frequency_penalty": generation.frequency_penalty,
        "presence_penalty": generation.presence_penalty,
    });
    if !generation.stop_sequences.is_empty() {
        options["stop"] = json!(generation.stop_sequences);
    }

    let mut body = json!({
        "model": request.model_name(),
        "messages": messages,
        "stream": false,
        "options": options,
    });
    if let Some(structured) = request.active_structured_output() {
        body["format"] = structured
            .active_schema()
            .cloned()
            .unwrap_or_else(|| json!("json"));
    }
    generation.apply_custom_fields(&mut body);
    body
}

#[async_trait]
impl ProviderAdapter for OllamaAdapter {
    fn api_type(&self) -> ApiType {
        ApiType::Ollama
    }

    async fn send(&self, request: &ModelCallRequest) -> Result<ModelResponse, AdapterError> {
        let Some(server) = request
            .credentials
            .ollama_api_key
            .as_ref()
            .filter(|s| !s.url.trim().is_empty())
        else {
            return Ok(ModelResponse::config_error("Ollama server URL is not configured"));
        };

        let url = format!("{}/api/chat", trim_base(&server.url));

        let mut builder = self.client.post(&url).json(&request_body(request));
        if let Some(key) = server.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            builder = builder.bearer_auth(key.trim());
        }

        let reply = match send_json(PROVIDER, builder).await? {
            Ok(reply) => reply,
            Err(response) => return Ok(response),
        };

        let text = reply
            .pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(finish_text(PROVIDER, request, text))
    }
}
