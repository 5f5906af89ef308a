//! Provider selector for a model call

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which model-serving backend a request targets (Value Object)
///
/// Unrecognized selectors are preserved in [`ApiType::Other`] so that a
/// request naming an unsupported provider can still be decoded and then
/// rejected with a configuration error instead of a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ApiType {
    Gemini,
    OpenAi,
    Ollama,
    Other(String),
}

impl ApiType {
    /// Wire identifier stored in agent model settings
    pub fn as_str(&self) -> &str {
        match self {
            ApiType::Gemini => "GEMINI_API_KEY",
            ApiType::OpenAi => "OPENAI_API_KEY",
            ApiType::Ollama => "OLLAMA_CUSTOM_URL",
            ApiType::Other(s) => s,
        }
    }

    /// The providers this crate knows how to talk to
    pub fn supported() -> [ApiType; 3] {
        [ApiType::Gemini, ApiType::OpenAi, ApiType::Ollama]
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ApiType::Other(_))
    }
}

impl std::fmt::Display for ApiType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApiType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "gemini_api_key" | "gemini" => ApiType::Gemini,
            "openai_api_key" | "openai" => ApiType::OpenAi,
            "ollama_custom_url" | "ollama" => ApiType::Ollama,
            _ => ApiType::Other(s.to_string()),
        })
    }
}

impl Serialize for ApiType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApiType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(api_type) = s.parse::<ApiType>();
        Ok(api_type)
    }
}
