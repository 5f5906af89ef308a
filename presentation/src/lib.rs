//! Presentation layer for delib
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{CallArgs, Cli, Command, GenerateArgs, OutputFormat, PayloadError};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, formatter_for};
pub use output::json::JsonFormatter;
