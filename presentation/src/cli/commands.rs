//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use delib_application::CallerIdentity;
use delib_domain::{
    AgentModelSettings, ApiKeyConfig, ApiType, ModelCallContext, ModelCallRequest,
    ModelGenerationConfig, PromptMessage, StructuredOutputConfig,
};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored output
    #[default]
    Text,
    /// Raw JSON
    Json,
}

/// CLI arguments for delib
#[derive(Parser, Debug)]
#[command(name = "delib")]
#[command(author, version, about = "Deliberation experiment backend: stage actions and agent model calls")]
#[command(long_about = r#"
delib runs the server-side actions of deliberation experiments against a
document store, and calls model providers on behalf of agent participants.

Configuration files are loaded from (in priority order):
1. DELIB_* environment variables (e.g. DELIB_ORCHESTRATION__MAX_RETRIES=3)
2. --config <path>     Explicit config file
3. ./delib.toml        Project-level config
4. ~/.config/delib/config.toml   Global config

Example:
  delib call createChatMessage --data @message.json
  delib call setStockAllocation --experimenter --uid admin --data '{"experimentId": "e1", ...}'
  delib generate --api gemini --model gemini-1.5-flash --prompt "Summarize the discussion"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one stage action against the configured document store
    Call(CallArgs),
    /// Ask a model provider for a response through the retrying orchestrator
    Generate(GenerateArgs),
    /// List the available action names
    Actions,
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Could not read payload file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Action name, e.g. createChatMessage
    pub action: String,

    /// JSON payload, or @path to read it from a file
    #[arg(short, long, value_name = "JSON|@FILE")]
    pub data: String,

    /// Call as an experimenter
    #[arg(long)]
    pub experimenter: bool,

    /// Authenticated caller id
    #[arg(long, value_name = "ID")]
    pub uid: Option<String>,
}

impl CallArgs {
    pub fn caller(&self) -> CallerIdentity {
        match (&self.uid, self.experimenter) {
            (Some(uid), true) => CallerIdentity::experimenter(uid.clone()),
            (Some(uid), false) => CallerIdentity::participant(uid.clone()),
            (None, _) => CallerIdentity::anonymous(),
        }
    }

    pub fn payload(&self) -> Result<Value, PayloadError> {
        let text = match self.data.strip_prefix('@') {
            Some(path) => {
                let path = PathBuf::from(path);
                std::fs::read_to_string(&path).map_err(|source| PayloadError::Read { path, source })?
            }
            None => self.data.clone(),
        };
        Ok(serde_json::from_str(&text)?)
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Provider: gemini, openai or ollama
    #[arg(long, value_name = "TYPE")]
    pub api: String,

    /// Model name as the provider knows it
    #[arg(short, long)]
    pub model: String,

    /// User prompt
    #[arg(short, long)]
    pub prompt: String,

    /// Optional system instruction
    #[arg(short, long)]
    pub system: Option<String>,

    /// Retries after the first attempt (defaults to the configured value)
    #[arg(long)]
    pub retries: Option<u32>,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f32>,

    /// Ask for a JSON object and parse it
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_name = "ID", default_value = "cli")]
    pub experiment: String,

    #[arg(long, value_name = "ID")]
    pub cohort: Option<String>,

    #[arg(long, value_name = "ID")]
    pub participant: Option<String>,

    #[arg(long, value_name = "ID")]
    pub stage: Option<String>,

    /// Description recorded in the model call log
    #[arg(long, default_value = "CLI generation")]
    pub description: String,
}

impl GenerateArgs {
    pub fn context(&self) -> ModelCallContext {
        let participant = self.participant.clone().unwrap_or_default();
        ModelCallContext::new(&self.experiment, &self.description)
            .with_cohort(self.cohort.clone().unwrap_or_default())
            .with_participant(participant.clone(), participant)
            .with_stage(self.stage.clone().unwrap_or_default())
    }

    /// Unknown provider names are kept as-is; the orchestrator answers
    /// them with a configuration error.
    pub fn to_request(&self, credentials: ApiKeyConfig) -> ModelCallRequest {
        let Ok(api_type) = self.api.parse::<ApiType>();

        let mut generation = ModelGenerationConfig::default();
        if let Some(max_tokens) = self.max_tokens {
            generation.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            generation.temperature = temperature;
        }

        let mut messages = Vec::new();
        if let Some(system) = &self.system {
            messages.push(PromptMessage::system(system.clone()));
        }
        messages.push(PromptMessage::user(self.prompt.clone()));

        let mut request = ModelCallRequest::new(
            AgentModelSettings::new(api_type, self.model.clone()),
            messages,
        )
        .with_generation_config(generation)
        .with_credentials(credentials);
        if self.json {
            request = request.with_structured_output(StructuredOutputConfig::json_format());
        }
        request
    }
}
