//! Infrastructure layer for delib
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: model provider clients, the document store,
//! audit sinks, and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChatConfig, FileConfig, FileLoggingConfig,
    FileOrchestrationConfig, FileProvidersConfig, FileStoreConfig,
};
pub use logging::{DocumentStoreModelLog, JsonlModelLogWriter};
pub use providers::{GeminiAdapter, OllamaAdapter, OpenAiAdapter, build_adapters};
pub use store::InMemoryDocumentStore;
