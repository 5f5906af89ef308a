//! Application layer for delib
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    auth_guard::{AllowAllGuard, AuthError, AuthGuard, CallerIdentity, ExperimenterGuard},
    clock::{Clock, SystemClock},
    document_store::{
        Document, DocumentStore, Mutator, Snapshot, StoreError, TransactionError, WriteBatch,
    },
    model_log::{CompositeModelLog, ModelLogError, ModelLogSink, NoModelLog},
    provider_adapter::{AdapterError, ProviderAdapter},
};
pub use use_cases::actions::{
    ActionError, ActionErrorCode, ActionResponse, ConfirmStockAllocationData,
    CreateChatMessageData, SetFlipCardInteractionData, SetStockAllocationData,
    UpdateChatStageParticipantAnswerData,
};
pub use use_cases::chat_message::{CreateChatMessageUseCase, UpdateChatParticipantAnswerUseCase};
pub use use_cases::dispatch::{ActionDispatcher, ActionName};
pub use use_cases::flipcard_interaction::SetFlipCardInteractionUseCase;
pub use use_cases::process_model_response::{AgentResponseOrchestrator, ProcessModelResponseInput};
pub use use_cases::stage_transaction::StageTransactionCoordinator;
pub use use_cases::stock_allocation::StockAllocationUseCase;
