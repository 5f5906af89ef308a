//! Console output formatter

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use delib_application::{ActionError, ActionName};
use delib_domain::ModelResponse;
use serde_json::Value;

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_action(&self, action: &str, response: &Value) -> String {
        let mut output = format!("{} {}\n", "✓".green().bold(), action.bold());
        if let Some(id) = response.get("id").and_then(Value::as_str) {
            output.push_str(&format!("  {} {}\n", "id:".cyan(), id));
        } else {
            output.push_str(&format!("  {}\n", Self::pretty(response).dimmed()));
        }
        output
    }

    fn format_action_error(&self, action: &str, error: &ActionError) -> String {
        format!(
            "{} {} {}\n  {}\n",
            "✗".red().bold(),
            action.bold(),
            format!("[{}]", error.code).red(),
            error.message
        )
    }

    fn format_model_response(&self, response: &ModelResponse) -> String {
        let mut output = Self::header("Model Response");
        output.push('\n');

        let status = response.status.to_string();
        let status = if response.is_ok() {
            status.green().bold()
        } else {
            status.red().bold()
        };
        output.push_str(&format!("{} {}\n\n", "Status:".cyan().bold(), status));

        if let Some(parsed) = &response.parsed_response {
            output.push_str(&format!("{}\n{}\n", "Parsed:".cyan().bold(), Self::pretty(parsed)));
        } else if let Some(text) = &response.text {
            output.push_str(text);
            output.push('\n');
        }

        if let Some(error) = &response.error_message {
            output.push_str(&format!("{} {}\n", "Error:".red().bold(), error));
        }
        output
    }

    fn format_actions(&self, actions: &[ActionName]) -> String {
        let mut output = format!("{}\n", "Available actions:".cyan().bold());
        for action in actions {
            output.push_str(&format!("  * {}\n", action));
        }
        output
    }
}
