//! Runtime sections: `[orchestration]`, `[chat]`, `[store]`, `[logging]`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Retry behavior of the agent response orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// First backoff step; doubles per attempt
    pub base_delay_ms: u64,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Upper bound of the random delay before a chat answer update (0 disables)
    pub answer_jitter_max_ms: u64,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            answer_jitter_max_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// JSON file the document store is loaded from and saved to
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving one line per model call attempt
    pub model_log_path: Option<PathBuf>,
    /// Also write audit entries under `experiments/{id}/logs`
    pub log_to_store: bool,
    /// Directory for daily-rolling diagnostic logs
    pub diagnostics_dir: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            model_log_path: None,
            log_to_store: true,
            diagnostics_dir: None,
        }
    }
}
