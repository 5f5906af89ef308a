//! In-process fakes shared by the use case tests.

use crate::ports::clock::Clock;
use crate::ports::document_store::{
    Document, DocumentStore, Mutator, Snapshot, StoreError, TransactionError,
};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use delib_domain::DocumentPath;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serializes every transaction behind one lock; never conflicts.
#[derive(Default)]
pub(crate) struct FakeDocumentStore {
    documents: Mutex<BTreeMap<DocumentPath, Document>>,
    transactions: AtomicUsize,
}

impl FakeDocumentStore {
    pub(crate) fn insert<T: Serialize>(&self, path: DocumentPath, value: &T) {
        self.documents
            .lock()
            .unwrap()
            .insert(path, serde_json::to_value(value).unwrap());
    }

    pub(crate) fn document(&self, path: &DocumentPath) -> Option<Document> {
        self.documents.lock().unwrap().get(path).cloned()
    }

    pub(crate) fn paths(&self) -> Vec<DocumentPath> {
        self.documents.lock().unwrap().keys().cloned().collect()
    }

    pub(crate) fn transactions(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Ok(self.document(path))
    }

    async fn set(&self, path: &DocumentPath, document: Document) -> Result<(), StoreError> {
        self.documents.lock().unwrap().insert(path.clone(), document);
        Ok(())
    }

    async fn run_transaction(
        &self,
        reads: &[DocumentPath],
        mutator: &mut Mutator<'_>,
    ) -> Result<(), TransactionError> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        let mut documents = self.documents.lock().unwrap();
        let snapshot = Snapshot::new(
            reads
                .iter()
                .map(|p| (p.clone(), documents.get(p).cloned()))
                .collect(),
        );
        let batch = mutator(&snapshot)?;
        documents.extend(batch.into_writes());
        Ok(())
    }
}

/// Fixed time; records sleeps instead of waiting.
pub(crate) struct FakeClock {
    now: DateTime<Utc>,
    sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
    pub(crate) fn new() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap(),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn fixed_now(&self) -> DateTime<Utc> {
        self.now
    }

    pub(crate) fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}
