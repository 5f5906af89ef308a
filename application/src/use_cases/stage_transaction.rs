//! Stage answer transaction coordinator
//!
//! Expresses each stage business rule as a pure mutator and runs it as one
//! atomic read-modify-write against the document store.

use crate::ports::document_store::{
    DocumentStore, Snapshot, StoreError, TransactionError, WriteBatch,
};
use delib_domain::DocumentPath;
use std::sync::Arc;
use tracing::debug;

pub struct StageTransactionCoordinator {
    store: Arc<dyn DocumentStore>,
}

impl StageTransactionCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Run `mutator` over a snapshot of `reads` and commit its writes.
    ///
    /// The mutator may run several times when the store detects a conflict;
    /// the value returned is the one from the run whose writes were applied.
    /// A rejection (`Err`) leaves every document untouched.
    pub async fn commit<T, F>(&self, reads: &[DocumentPath], mutator: F) -> Result<T, TransactionError>
    where
        T: Send,
        F: Fn(&Snapshot) -> Result<(WriteBatch, T), TransactionError> + Send + Sync,
    {
        let mut output = None;
        let mut runs = 0u32;
        let mut body = |snapshot: &Snapshot| -> Result<WriteBatch, TransactionError> {
            runs += 1;
            let (batch, value) = mutator(snapshot)?;
            output = Some(value);
            Ok(batch)
        };

        self.store.run_transaction(reads, &mut body).await?;
        debug!(reads = reads.len(), runs, "Stage transaction committed");

        output.ok_or_else(|| {
            TransactionError::Store(StoreError::Backend(
                "transaction committed without running its mutator".to_string(),
            ))
        })
    }
}
