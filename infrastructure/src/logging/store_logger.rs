//! Audit sink that writes entries into the document store

use async_trait::async_trait;
use delib_application::{DocumentStore, ModelLogError, ModelLogSink};
use delib_domain::{DocumentPath, ModelLogEntry};
use std::sync::Arc;

/// Writes each entry to `experiments/{experimentId}/logs/{entry.id}`.
pub struct DocumentStoreModelLog {
    store: Arc<dyn DocumentStore>,
}

impl DocumentStoreModelLog {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ModelLogSink for DocumentStoreModelLog {
    async fn append(&self, experiment_id: &str, entry: &ModelLogEntry) -> Result<(), ModelLogError> {
        let path = DocumentPath::model_log(experiment_id, &entry.id);
        let document = serde_json::to_value(entry)?;
        self.store
            .set(&path, document)
            .await
            .map_err(|e| ModelLogError::Store(e.to_string()))
    }
}
