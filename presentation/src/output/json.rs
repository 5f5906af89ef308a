//! JSON output formatter

use crate::output::formatter::OutputFormatter;
use delib_application::{ActionError, ActionName};
use delib_domain::ModelResponse;
use serde_json::{Value, json};

/// Machine-readable output, one JSON document per command
pub struct JsonFormatter;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

impl OutputFormatter for JsonFormatter {
    fn format_action(&self, _action: &str, response: &Value) -> String {
        pretty(response)
    }

    fn format_action_error(&self, _action: &str, error: &ActionError) -> String {
        pretty(&json!({ "error": error }))
    }

    fn format_model_response(&self, response: &ModelResponse) -> String {
        serde_json::to_value(response)
            .map(|v| pretty(&v))
            .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_actions(&self, actions: &[ActionName]) -> String {
        pretty(&json!(actions.iter().map(ActionName::as_str).collect::<Vec<_>>()))
    }
}
