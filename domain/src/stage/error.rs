//! Business-rule rejections raised while applying a stage action

use super::StageKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("Stock allocations must sum to 100% (got {total})")]
    InvalidAllocation { total: f64 },

    #[error("Allocation for stock {stock_id} is not a finite number")]
    NonFiniteAllocation { stock_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Allocation already confirmed")]
    AlreadyConfirmed,

    #[error("No allocations found to confirm")]
    NoAllocation,

    #[error("Stage not found: {stage_id}")]
    StageNotFound { stage_id: String },

    #[error("Stage {stage_id} is a {found} stage, expected {expected}")]
    WrongStageKind {
        stage_id: String,
        expected: StageKind,
        found: StageKind,
    },
}

impl StageError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        StageError::InvalidInput(message.into())
    }
}
