//! Document store port
//!
//! Defines the interface for the hierarchical key/value document store the
//! stage actions are committed to.
//!
//! ## Transaction semantics
//!
//! [`DocumentStore::run_transaction`] takes the set of documents to read and a
//! mutator. The store snapshots the read set, hands the [`Snapshot`] to the
//! mutator, and applies the returned [`WriteBatch`] atomically relative to any
//! other transaction that touches the same documents. On a conflict the store
//! may run the mutator again with a fresh snapshot, so mutators must be free
//! of side effects outside the batch they return.

use async_trait::async_trait;
use delib_domain::{DocumentPath, StageError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A stored document (always a JSON object in practice)
pub type Document = Value;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum TransactionError {
    /// A business rule refused the change; nothing was written.
    #[error(transparent)]
    Rejected(#[from] StageError),

    #[error("Failed to decode document {path}: {source}")]
    Decode {
        path: DocumentPath,
        source: serde_json::Error,
    },

    #[error("Failed to encode document {path}: {source}")]
    Encode {
        path: DocumentPath,
        source: serde_json::Error,
    },

    #[error("Document {0} was not declared in the transaction read set")]
    UndeclaredRead(DocumentPath),

    #[error("Transaction aborted after {attempts} attempts due to concurrent writes")]
    Contention { attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Consistent view of a transaction's read set
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    documents: BTreeMap<DocumentPath, Option<Document>>,
}

impl Snapshot {
    /// `None` marks a declared document that does not exist.
    pub fn new(documents: BTreeMap<DocumentPath, Option<Document>>) -> Self {
        Self { documents }
    }

    pub fn get(&self, path: &DocumentPath) -> Result<Option<&Document>, TransactionError> {
        self.documents
            .get(path)
            .map(Option::as_ref)
            .ok_or_else(|| TransactionError::UndeclaredRead(path.clone()))
    }

    /// Read and decode a declared document.
    pub fn read<T: DeserializeOwned>(&self, path: &DocumentPath) -> Result<Option<T>, TransactionError> {
        match self.get(path)? {
            None => Ok(None),
            Some(doc) => serde_json::from_value(doc.clone())
                .map(Some)
                .map_err(|source| TransactionError::Decode {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Full-document writes produced by a mutator, applied all-or-nothing
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: BTreeMap<DocumentPath, Document>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the document at `path`; a later set of the same path wins.
    pub fn set<T: Serialize>(&mut self, path: DocumentPath, value: &T) -> Result<(), TransactionError> {
        let document = serde_json::to_value(value).map_err(|source| TransactionError::Encode {
            path: path.clone(),
            source,
        })?;
        self.writes.insert(path, document);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &DocumentPath> {
        self.writes.keys()
    }

    pub fn into_writes(self) -> BTreeMap<DocumentPath, Document> {
        self.writes
    }
}

/// Transaction body; may be invoked more than once.
pub type Mutator<'a> = dyn FnMut(&Snapshot) -> Result<WriteBatch, TransactionError> + Send + 'a;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Unconditional write outside any transaction
    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError>;

    /// Atomic read-modify-write over `reads`
    async fn run_transaction(
        &self,
        reads: &[DocumentPath],
        mutator: &mut Mutator<'_>,
    ) -> Result<(), TransactionError>;
}
