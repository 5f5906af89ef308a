//! Output formatter trait

use crate::cli::commands::OutputFormat;
use delib_application::{ActionError, ActionName};
use delib_domain::ModelResponse;
use serde_json::Value;

/// Trait for rendering command results
pub trait OutputFormatter {
    /// Successful action response
    fn format_action(&self, action: &str, response: &Value) -> String;

    /// Rejected action
    fn format_action_error(&self, action: &str, error: &ActionError) -> String;

    /// Final orchestrator response (after retries)
    fn format_model_response(&self, response: &ModelResponse) -> String;

    /// The action catalogue
    fn format_actions(&self, actions: &[ActionName]) -> String;
}

/// Pick the formatter for the requested output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(super::console::ConsoleFormatter),
        OutputFormat::Json => Box::new(super::json::JsonFormatter),
    }
}
