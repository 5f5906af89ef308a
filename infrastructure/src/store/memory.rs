//! In-memory document store with optimistic concurrency control
//!
//! Every document carries a version. A transaction records the versions of
//! its read set, runs the mutator without holding the lock, and applies the
//! writes only if none of those versions moved in the meantime. Otherwise
//! the mutator runs again against a fresh snapshot.

use async_trait::async_trait;
use delib_application::{
    Document, DocumentStore, Mutator, Snapshot, StoreError, TransactionError,
};
use delib_domain::DocumentPath;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Version 0 means "absent"
const ABSENT: u64 = 0;

#[derive(Debug, Clone)]
struct Versioned {
    document: Document,
    version: u64,
}

#[derive(Debug, Default)]
struct State {
    documents: BTreeMap<DocumentPath, Versioned>,
    last_version: u64,
}

impl State {
    fn version_of(&self, path: &DocumentPath) -> u64 {
        self.documents.get(path).map_or(ABSENT, |v| v.version)
    }

    fn write(&mut self, path: DocumentPath, document: Document) {
        self.last_version += 1;
        let version = self.last_version;
        self.documents.insert(path, Versioned { document, version });
    }
}

pub struct InMemoryDocumentStore {
    state: Mutex<State>,
    max_attempts: u32,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("document store lock poisoned".to_string()))
    }

    /// Seed or overwrite a document outside any transaction.
    pub fn insert(&self, path: DocumentPath, document: Document) -> Result<(), StoreError> {
        self.lock()?.write(path, document);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.lock()?.documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Copy of every document, keyed by path
    pub fn documents(&self) -> Result<BTreeMap<DocumentPath, Document>, StoreError> {
        Ok(self
            .lock()?
            .documents
            .iter()
            .map(|(path, v)| (path.clone(), v.document.clone()))
            .collect())
    }

    /// Load a store from a JSON object of `{path: document}`.
    /// A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let store = Self::new();
        if !path.exists() {
            debug!("Store file {} not found, starting empty", path.display());
            return Ok(store);
        }

        let content = fs::read_to_string(path)?;
        let raw: BTreeMap<String, Document> = serde_json::from_str(&content)?;
        {
            let mut state = store.lock()?;
            for (key, document) in raw {
                let doc_path: DocumentPath = key
                    .parse()
                    .map_err(|e| StoreError::Backend(format!("{}: {e}", path.display())))?;
                state.write(doc_path, document);
            }
        }

        info!("Loaded {} documents from {}", store.len()?, path.display());
        Ok(store)
    }

    /// Write every document to `path` as one JSON object.
    ///
    /// The file is written next to the target and renamed into place.
    pub fn persist(&self, path: &Path) -> Result<(), StoreError> {
        let raw: BTreeMap<String, Document> = self
            .documents()?
            .into_iter()
            .map(|(p, d)| (p.to_string(), d))
            .collect();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&raw)?)?;
        fs::rename(&tmp, path)?;

        debug!("Persisted {} documents to {}", raw.len(), path.display());
        Ok(())
    }

    fn snapshot(&self, reads: &[DocumentPath]) -> Result<(Snapshot, Vec<u64>), StoreError> {
        let state = self.lock()?;
        let versions = reads.iter().map(|p| state.version_of(p)).collect();
        let documents = reads
            .iter()
            .map(|p| (p.clone(), state.documents.get(p).map(|v| v.document.clone())))
            .collect();
        Ok((Snapshot::new(documents), versions))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Ok(self.lock()?.documents.get(path).map(|v| v.document.clone()))
    }

    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError> {
        self.insert(path.clone(), document)
    }

    async fn run_transaction(
        &self,
        reads: &[DocumentPath],
        mutator: &mut Mutator<'_>,
    ) -> Result<(), TransactionError> {
        for attempt in 1..=self.max_attempts {
            let (snapshot, versions) = self.snapshot(reads)?;
            let batch = mutator(&snapshot)?;

            {
                let mut state = self.lock()?;
                let unchanged = reads
                    .iter()
                    .zip(&versions)
                    .all(|(path, seen)| state.version_of(path) == *seen);

                if unchanged {
                    for (path, document) in batch.into_writes() {
                        state.write(path, document);
                    }
                    return Ok(());
                }
            }

            debug!(attempt, "Transaction read set changed, retrying");
            tokio::task::yield_now().await;
        }

        warn!(
            attempts = self.max_attempts,
            "Transaction aborted after repeated conflicts"
        );
        Err(TransactionError::Contention {
            attempts: self.max_attempts,
        })
    }
}
