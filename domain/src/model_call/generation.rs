//! Generation parameters and structured-output settings

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Extra field merged verbatim into a provider request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRequestBodyField {
    pub name: String,
    pub value: Value,
}

/// Sampling parameters shared by every provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelGenerationConfig {
    pub max_tokens: u32,
    pub stop_sequences: Vec<String>,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub custom_request_body_fields: Vec<CustomRequestBodyField>,
}

impl Default for ModelGenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 300,
            stop_sequences: Vec::new(),
            temperature: 0.5,
            top_p: 0.1,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            custom_request_body_fields: Vec::new(),
        }
    }
}

impl ModelGenerationConfig {
    /// Merge the custom fields into a JSON request body (object bodies only).
    pub fn apply_custom_fields(&self, body: &mut Value) {
        if let Value::Object(map) = body {
            for field in &self.custom_request_body_fields {
                map.insert(field.name.clone(), field.value.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StructuredOutputType {
    #[default]
    None,
    JsonFormat,
    JsonSchema,
}

/// Request for machine-readable output
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredOutputConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub output_type: StructuredOutputType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

impl StructuredOutputConfig {
    pub fn json_schema(schema: Value) -> Self {
        Self {
            enabled: true,
            output_type: StructuredOutputType::JsonSchema,
            schema: Some(schema),
        }
    }

    pub fn json_format() -> Self {
        Self {
            enabled: true,
            output_type: StructuredOutputType::JsonFormat,
            schema: None,
        }
    }

    /// Whether the provider should be asked for JSON at all
    pub fn is_active(&self) -> bool {
        self.enabled && self.output_type != StructuredOutputType::None
    }

    /// The schema to send, only when a schema-constrained response is wanted
    pub fn active_schema(&self) -> Option<&Value> {
        if self.is_active() && self.output_type == StructuredOutputType::JsonSchema {
            self.schema.as_ref()
        } else {
            None
        }
    }
}

/// Parse model output text as JSON.
///
/// Accepts raw JSON or a single fenced block (` ```json ` or bare ` ``` `).
pub fn parse_structured_output(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let body = trimmed.strip_prefix("```")?;
    let body = body.strip_prefix("json").unwrap_or(body);
    let body = body.trim_end().strip_suffix("```")?;
    serde_json::from_str(body.trim()).ok()
}
