//! Domain error types

use thiserror::Error;

/// Errors raised while building domain values from raw input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Unknown flip card event: {0}")]
    UnknownFlipCardEvent(String),

    #[error("Invalid document path: {0}")]
    InvalidDocumentPath(String),
}
