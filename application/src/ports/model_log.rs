//! Port for the model-call audit log.
//!
//! Defines the [`ModelLogSink`] trait for persisting one
//! [`ModelLogEntry`] per provider attempt.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures every
//! attempt in a machine-readable, append-only form.

use async_trait::async_trait;
use delib_domain::ModelLogEntry;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelLogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

/// Append-only audit sink keyed by experiment.
///
/// Callers treat failures as non-fatal: the orchestrator reports them and
/// carries on with the response path.
#[async_trait]
pub trait ModelLogSink: Send + Sync {
    async fn append(&self, experiment_id: &str, entry: &ModelLogEntry) -> Result<(), ModelLogError>;
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoModelLog;

#[async_trait]
impl ModelLogSink for NoModelLog {
    async fn append(&self, _experiment_id: &str, _entry: &ModelLogEntry) -> Result<(), ModelLogError> {
        Ok(())
    }
}

/// A sink that forwards every entry to several inner sinks.
///
/// Every sink receives the entry even if an earlier one fails; the first
/// failure is returned after all sinks were tried.
pub struct CompositeModelLog {
    sinks: Vec<Arc<dyn ModelLogSink>>,
}

impl CompositeModelLog {
    pub fn new(sinks: Vec<Arc<dyn ModelLogSink>>) -> Self {
        Self { sinks }
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl ModelLogSink for CompositeModelLog {
    async fn append(&self, experiment_id: &str, entry: &ModelLogEntry) -> Result<(), ModelLogError> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.append(experiment_id, entry).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
