//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod auth_guard;
pub mod clock;
pub mod document_store;
pub mod model_log;
pub mod provider_adapter;
