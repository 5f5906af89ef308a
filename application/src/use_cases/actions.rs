//! Action endpoint types: request payloads, responses and typed errors.
//!
//! Request payloads are strict: unknown fields are rejected on decode and
//! every identifier must be non-empty.

use crate::ports::auth_guard::AuthError;
use crate::ports::document_store::TransactionError;
use delib_domain::{
    Allocations, ChatMessage, ChatStageParticipantAnswer, DomainError, FlipCardEvent, StageError,
    StageKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// User-visible error category of a failed action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionErrorCode {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Unauthenticated,
    PermissionDenied,
    Internal,
}

impl ActionErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionErrorCode::InvalidArgument => "invalid-argument",
            ActionErrorCode::NotFound => "not-found",
            ActionErrorCode::FailedPrecondition => "failed-precondition",
            ActionErrorCode::Unauthenticated => "unauthenticated",
            ActionErrorCode::PermissionDenied => "permission-denied",
            ActionErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for ActionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ActionError {
    pub code: ActionErrorCode,
    pub message: String,
}

impl ActionError {
    pub fn new(code: ActionErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::InvalidArgument, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::NotFound, message)
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::FailedPrecondition, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ActionErrorCode::Internal, message)
    }
}

impl From<StageError> for ActionError {
    fn from(e: StageError) -> Self {
        let code = match &e {
            StageError::InvalidAllocation { .. }
            | StageError::NonFiniteAllocation { .. }
            | StageError::InvalidInput(_) => ActionErrorCode::InvalidArgument,
            StageError::StageNotFound { .. } => ActionErrorCode::NotFound,
            StageError::AlreadyConfirmed
            | StageError::NoAllocation
            | StageError::WrongStageKind { .. } => ActionErrorCode::FailedPrecondition,
        };
        Self::new(code, e.to_string())
    }
}

impl From<TransactionError> for ActionError {
    fn from(e: TransactionError) -> Self {
        match e {
            TransactionError::Rejected(stage) => stage.into(),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ActionError {
    fn from(e: AuthError) -> Self {
        let code = match e {
            AuthError::Unauthenticated => ActionErrorCode::Unauthenticated,
            AuthError::PermissionDenied(_) => ActionErrorCode::PermissionDenied,
        };
        Self::new(code, e.to_string())
    }
}

impl From<DomainError> for ActionError {
    fn from(e: DomainError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

/// Successful action result: `{"success": true}` or `{"id": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Created { id: String },
    Success { success: bool },
}

impl ActionResponse {
    pub fn success() -> Self {
        ActionResponse::Success { success: true }
    }

    pub fn created(id: impl Into<String>) -> Self {
        ActionResponse::Created { id: id.into() }
    }
}

fn require(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::EmptyField(field));
    }
    Ok(())
}

// ==================== Request payloads ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateChatMessageData {
    pub experiment_id: String,
    pub cohort_id: String,
    pub stage_id: String,
    /// Private participant id
    pub participant_id: String,
    pub chat_message: ChatMessage,
}

impl CreateChatMessageData {
    pub fn validate(&self) -> Result<(), ActionError> {
        require("experimentId", &self.experiment_id)?;
        require("cohortId", &self.cohort_id)?;
        require("stageId", &self.stage_id)?;
        require("participantId", &self.participant_id)?;
        require("chatMessage.id", &self.chat_message.id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateChatStageParticipantAnswerData {
    pub experiment_id: String,
    pub cohort_id: String,
    pub participant_private_id: String,
    pub participant_public_id: String,
    pub chat_stage_participant_answer: ChatStageParticipantAnswer,
}

impl UpdateChatStageParticipantAnswerData {
    pub fn validate(&self) -> Result<(), ActionError> {
        require("experimentId", &self.experiment_id)?;
        require("cohortId", &self.cohort_id)?;
        require("participantPrivateId", &self.participant_private_id)?;
        require("participantPublicId", &self.participant_public_id)?;
        require(
            "chatStageParticipantAnswer.id",
            &self.chat_stage_participant_answer.id,
        )?;
        if self.chat_stage_participant_answer.kind != StageKind::Chat {
            return Err(StageError::invalid_input(format!(
                "chat answer must have kind chat, got {}",
                self.chat_stage_participant_answer.kind
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetFlipCardInteractionData {
    pub experiment_id: String,
    pub cohort_id: String,
    pub stage_id: String,
    pub participant_id: String,
    pub event_type: FlipCardEvent,
    pub card_id: String,
}

impl SetFlipCardInteractionData {
    pub fn validate(&self) -> Result<(), ActionError> {
        require("experimentId", &self.experiment_id)?;
        require("cohortId", &self.cohort_id)?;
        require("stageId", &self.stage_id)?;
        require("participantId", &self.participant_id)?;
        require("cardId", &self.card_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SetStockAllocationData {
    pub experiment_id: String,
    pub cohort_id: String,
    pub stage_id: String,
    pub participant_id: String,
    pub allocations: Allocations,
}

impl SetStockAllocationData {
    pub fn validate(&self) -> Result<(), ActionError> {
        require("experimentId", &self.experiment_id)?;
        require("cohortId", &self.cohort_id)?;
        require("stageId", &self.stage_id)?;
        require("participantId", &self.participant_id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfirmStockAllocationData {
    pub experiment_id: String,
    pub cohort_id: String,
    pub stage_id: String,
    pub participant_id: String,
}

impl ConfirmStockAllocationData {
    pub fn validate(&self) -> Result<(), ActionError> {
        require("experimentId", &self.experiment_id)?;
        require("cohortId", &self.cohort_id)?;
        require("stageId", &self.stage_id)?;
        require("participantId", &self.participant_id)?;
        Ok(())
    }
}
