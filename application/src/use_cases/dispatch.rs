//! Action dispatcher
//!
//! Routes a named action with a JSON payload to its use case and returns the
//! JSON response.

use crate::config::ExecutionParams;
use crate::ports::auth_guard::{AuthGuard, CallerIdentity};
use crate::ports::clock::Clock;
use crate::ports::document_store::DocumentStore;
use crate::use_cases::actions::{ActionError, ActionResponse};
use crate::use_cases::chat_message::{CreateChatMessageUseCase, UpdateChatParticipantAnswerUseCase};
use crate::use_cases::flipcard_interaction::SetFlipCardInteractionUseCase;
use crate::use_cases::stage_transaction::StageTransactionCoordinator;
use crate::use_cases::stock_allocation::StockAllocationUseCase;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Callable action endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionName {
    CreateChatMessage,
    UpdateChatStageParticipantAnswer,
    SetFlipCardInteraction,
    SetStockAllocation,
    ConfirmStockAllocation,
}

impl ActionName {
    pub fn all() -> [ActionName; 5] {
        [
            ActionName::CreateChatMessage,
            ActionName::UpdateChatStageParticipantAnswer,
            ActionName::SetFlipCardInteraction,
            ActionName::SetStockAllocation,
            ActionName::ConfirmStockAllocation,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::CreateChatMessage => "createChatMessage",
            ActionName::UpdateChatStageParticipantAnswer => "updateChatStageParticipantAnswer",
            ActionName::SetFlipCardInteraction => "setFlipCardInteraction",
            ActionName::SetStockAllocation => "setStockAllocation",
            ActionName::ConfirmStockAllocation => "confirmStockAllocation",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionName {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionName::all()
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ActionError::invalid_argument(format!("Unknown action: {s}")))
    }
}

fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ActionError> {
    serde_json::from_value(payload)
        .map_err(|e| ActionError::invalid_argument(format!("Invalid data: {e}")))
}

pub struct ActionDispatcher {
    create_chat_message: CreateChatMessageUseCase,
    update_chat_answer: UpdateChatParticipantAnswerUseCase,
    flipcard: SetFlipCardInteractionUseCase,
    stock_allocation: StockAllocationUseCase,
}

impl ActionDispatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        allocation_guard: Arc<dyn AuthGuard>,
        params: &ExecutionParams,
    ) -> Self {
        let coordinator = Arc::new(StageTransactionCoordinator::new(store));
        Self {
            create_chat_message: CreateChatMessageUseCase::new(coordinator.clone(), clock.clone()),
            update_chat_answer: UpdateChatParticipantAnswerUseCase::new(
                coordinator.clone(),
                clock.clone(),
                params.answer_jitter_max,
            ),
            flipcard: SetFlipCardInteractionUseCase::new(coordinator.clone(), clock),
            stock_allocation: StockAllocationUseCase::new(coordinator, allocation_guard),
        }
    }

    pub async fn dispatch(
        &self,
        action: &str,
        caller: &CallerIdentity,
        payload: Value,
    ) -> Result<Value, ActionError> {
        let action: ActionName = action.parse()?;
        debug!(action = %action, "Dispatching action");

        let result = self.route(action, caller, payload).await;
        if let Err(e) = &result {
            warn!(action = %action, code = %e.code, error = %e.message, "Action failed");
        }

        let response = result?;
        serde_json::to_value(response).map_err(|e| ActionError::internal(e.to_string()))
    }

    async fn route(
        &self,
        action: ActionName,
        caller: &CallerIdentity,
        payload: Value,
    ) -> Result<ActionResponse, ActionError> {
        match action {
            ActionName::CreateChatMessage => {
                self.create_chat_message.execute(decode(payload)?).await
            }
            ActionName::UpdateChatStageParticipantAnswer => {
                self.update_chat_answer.execute(decode(payload)?).await
            }
            ActionName::SetFlipCardInteraction => self.flipcard.execute(decode(payload)?).await,
            ActionName::SetStockAllocation => {
                self.stock_allocation
                    .set_allocation(caller, decode(payload)?)
                    .await
            }
            ActionName::ConfirmStockAllocation => {
                self.stock_allocation
                    .confirm_allocation(caller, decode(payload)?)
                    .await
            }
        }
    }
}
