//! Document store adapters

pub mod memory;

pub use memory::{DEFAULT_MAX_ATTEMPTS, InMemoryDocumentStore};
