//! Provider configuration from TOML (`[providers]` section)

use delib_domain::{ApiKeyConfig, OllamaServerConfig, OpenAiServerConfig};
use serde::{Deserialize, Serialize};

/// Gemini API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGeminiConfig {
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key; takes precedence over the environment variable.
    pub api_key: Option<String>,
    /// Base URL for the Gemini API.
    pub base_url: String,
}

impl Default for FileGeminiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// OpenAI-compatible API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key; takes precedence over the environment variable.
    pub api_key: Option<String>,
    /// Base URL, including the version segment (any compatible server works).
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Ollama server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub url: String,
    /// Only needed behind an authenticating proxy.
    pub api_key: Option<String>,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// HTTP timeout per provider call, in seconds.
    pub timeout_secs: u64,
    pub gemini: FileGeminiConfig,
    pub openai: FileOpenAiConfig,
    pub ollama: FileOllamaConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            gemini: FileGeminiConfig::default(),
            openai: FileOpenAiConfig::default(),
            ollama: FileOllamaConfig::default(),
        }
    }
}

/// Explicit key first, then the named environment variable, then empty.
fn resolve_key(
    explicit: Option<&String>,
    env_name: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> String {
    explicit
        .filter(|k| !k.trim().is_empty())
        .cloned()
        .or_else(|| lookup(env_name).filter(|k| !k.trim().is_empty()))
        .unwrap_or_default()
}

impl FileProvidersConfig {
    /// Default credentials for model calls, read from the process environment.
    pub fn resolve_credentials(&self) -> ApiKeyConfig {
        self.resolve_credentials_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_credentials_with(&self, lookup: impl Fn(&str) -> Option<String>) -> ApiKeyConfig {
        let gemini_api_key = resolve_key(
            self.gemini.api_key.as_ref(),
            &self.gemini.api_key_env,
            &lookup,
        );
        let openai_key = resolve_key(
            self.openai.api_key.as_ref(),
            &self.openai.api_key_env,
            &lookup,
        );

        ApiKeyConfig {
            gemini_api_key,
            openai_api_key: (!openai_key.is_empty()).then(|| OpenAiServerConfig {
                api_key: openai_key,
                base_url: Some(self.openai.base_url.clone()),
            }),
            ollama_api_key: (!self.ollama.url.trim().is_empty()).then(|| OllamaServerConfig {
                url: self.ollama.url.clone(),
                api_key: self.ollama.api_key.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_explicit_key_wins_over_env() {
        let mut config = FileProvidersConfig::default();
        config.gemini.api_key = Some("from-file".to_string());

        let creds = config.resolve_credentials_with(env(&[("GEMINI_API_KEY", "from-env")]));

        assert_eq!(creds.gemini_api_key, "from-file");
    }

    #[test]
    fn test_env_key_and_custom_env_name() {
        let mut config = FileProvidersConfig::default();
        config.openai.api_key_env = "MY_OPENAI".to_string();

        let creds = config.resolve_credentials_with(env(&[
            ("GEMINI_API_KEY", "g"),
            ("MY_OPENAI", "sk"),
        ]));

        assert_eq!(creds.gemini_api_key, "g");
        let openai = creds.openai_api_key.unwrap();
        assert_eq!(openai.api_key, "sk");
        assert_eq!(openai.base_url.as_deref(), Some("https://api.openai.com/v1"));
    }

    #[test]
    fn test_missing_keys_resolve_empty() {
        let creds = FileProvidersConfig::default().resolve_credentials_with(env(&[]));

        assert!(creds.gemini_api_key.is_empty());
        assert!(creds.openai_api_key.is_none());
        assert_eq!(creds.ollama_api_key.unwrap().url, "http://localhost:11434");
    }

    #[test]
    fn test_deserialize_partial_section() {
        let toml_str = r#"
timeout_secs = 10

[ollama]
url = "http://gpu-box:11434"
"#;
        let config: FileProvidersConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.ollama.url, "http://gpu-box:11434");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
    }
}
