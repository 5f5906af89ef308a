//! Model call values: what is sent to a provider, what comes back, and
//! how failed attempts are classified for retry.
//!
//! - [`ModelCallRequest`]: provider selector, prompt, generation settings, credentials
//! - [`ModelResponse`]: status plus optional text / parsed JSON / error message
//! - [`ModelLogEntry`]: the audit record written for every attempt
//! - [`RetryPolicy`]: which statuses are retried and how long to wait

pub mod api_type;
pub mod credentials;
pub mod generation;
pub mod log_entry;
pub mod prompt;
pub mod request;
pub mod response;
pub mod retry;

pub use api_type::ApiType;
pub use credentials::{ApiKeyConfig, OllamaServerConfig, OpenAiServerConfig};
pub use generation::{
    CustomRequestBodyField, ModelGenerationConfig, StructuredOutputConfig, StructuredOutputType,
    parse_structured_output,
};
pub use log_entry::ModelLogEntry;
pub use prompt::{Prompt, PromptMessage};
pub use request::{AgentModelSettings, ModelCallContext, ModelCallRequest};
pub use response::{ModelResponse, ModelResponseStatus};
pub use retry::RetryPolicy;
