//! Logging infrastructure: model call audit sinks.
//!
//! - [`JsonlModelLogWriter`]: one JSON line per attempt, appended to a file
//! - [`DocumentStoreModelLog`]: one document per attempt under the experiment

mod jsonl_logger;
mod store_logger;

pub use jsonl_logger::JsonlModelLogWriter;
pub use store_logger::DocumentStoreModelLog;
