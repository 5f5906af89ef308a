//! Gemini `generateContent` adapter

use super::http::{finish_text, send_json, trim_base};
use async_trait::async_trait;
use delib_application::{AdapterError, ProviderAdapter};
use delib_domain::{ApiType, ModelCallRequest, ModelResponse, PromptMessage};
use reqwest::Client;
use serde_json::{Map, Value, json};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const PROVIDER: &str = "Gemini";

pub struct GeminiAdapter {
    client: Client,
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_GEMINI_BASE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url.as_ref()),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

/// Build the request body. System messages become `systemInstruction`,
/// assistant turns use Gemini's `model` role.
fn request_body(request: &ModelCallRequest) -> Value {
    let messages = request.prompt.to_messages();
    let (system, turns): (Vec<&PromptMessage>, Vec<&PromptMessage>) =
        messages.iter().partition(|m| m.role == "system");

    let contents: Vec<Value> = turns
        .iter()
        .map(|m| {
            let role = match m.role.as_str() {
                "assistant" | "model" => "model",
                _ => "user",
            };
            json!({ "role": role, "parts": [{ "text": m.content }] })
        })
        .collect();

    let generation = &request.generation_config;
    let mut config = Map::new();
    config.insert("maxOutputTokens".into(), json!(generation.max_tokens));
    config.insert("temperature".into(), json!(generation.temperature));
    config.insert("topP".into(), json!(generation.top_p));
    config.insert("frequencyPenalty".into(), json!(generation.frequency_penalty));
    config.insert("presencePenalty".into(), json!(generation.presence_penalty));
    if !generation.stop_sequences.is_empty() {
        config.insert("stopSequences".into(), json!(generation.stop_sequences));
    }
    if let Some(structured) = request.active_structured_output() {
        config.insert("responseMimeType".into(), json!("application/json"));
        if let Some(schema) = structured.active_schema() {
            config.insert("responseSchema".into(), schema.clone());
        }
    }

    let mut body = json!({
        "contents": contents,
        "generationConfig": Value::Object(config),
    });
    if !system.is_empty() {
        let parts: Vec<Value> = system.iter().map(|m| json!({ "text": m.content })).collect();
        body["systemInstruction"] = json!({ "parts": parts });
    }
    generation.apply_custom_fields(&mut body);
    body
}

/// Concatenated text of the first candidate, or a description of why
/// there is none.
fn extract_text(reply: &Value) -> Result<Option<String>, String> {
    if let Some(reason) = reply
        .pointer("/promptFeedback/blockReason")
        .and_then(Value::as_str)
    {
        return Err(format!("prompt was blocked ({reason})"));
    }

    let Some(candidate) = reply.pointer("/candidates/0") else {
        return Err("no candidates returned".to_string());
    };

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty()
        && let Some(reason) = candidate.get("finishReason").and_then(Value::as_str)
        && reason != "STOP"
    {
        return Err(format!("response was cut off ({reason})"));
    }
    Ok(Some(text))
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn api_type(&self) -> ApiType {
        ApiType::Gemini
    }

    async fn send(&self, request: &ModelCallRequest) -> Result<ModelResponse, AdapterError> {
        let api_key = request.credentials.gemini_api_key.trim();
        if api_key.is_empty() {
            return Ok(ModelResponse::config_error("Gemini API key is not configured"));
        }

        let url = self.endpoint(request.model_name());

        let builder = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(request));

        let reply = match send_json(PROVIDER, builder).await? {
            Ok(reply) => reply,
            Err(response) => return Ok(response),
        };

        Ok(match extract_text(&reply) {
            Ok(text) => finish_text(PROVIDER, request, text),
            Err(reason) => ModelResponse::internal_error(format!("{PROVIDER} {reason}")),
        })
    }
}
