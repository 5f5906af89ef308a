//! Configuration file loading for delib
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `DELIB_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./delib.toml` or `./.delib.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/delib/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileChatConfig, FileConfig, FileGeminiConfig, FileLoggingConfig,
    FileOllamaConfig, FileOpenAiConfig, FileOrchestrationConfig, FileProvidersConfig,
    FileStoreConfig,
};
pub use loader::ConfigLoader;
