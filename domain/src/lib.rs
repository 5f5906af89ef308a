//! Domain layer for delib
//!
//! This crate contains the core values and rules of the deliberation
//! backend. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Model calls
//!
//! An agent asks a model provider for a response through a
//! [`ModelCallRequest`]. Every attempt produces a [`ModelResponse`] and a
//! [`ModelLogEntry`]; the [`RetryPolicy`] decides whether another attempt
//! follows.
//!
//! ## Stages
//!
//! An experiment is a sequence of stages. Each participant owns one answer
//! document per stage and each cohort shares one public document per stage:
//!
//! - **Chat**: messages are routed to a private or a group collection
//! - **Flip-card**: interaction history plus a confirmed selection per participant
//! - **Stock-picker**: allocation answer that is set, then confirmed once

pub mod core;
pub mod document;
pub mod model_call;
pub mod stage;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    string::{document_id_from, excerpt},
};
pub use document::DocumentPath;
pub use model_call::{
    AgentModelSettings, ApiKeyConfig, ApiType, CustomRequestBodyField, ModelCallContext,
    ModelCallRequest, ModelGenerationConfig, ModelLogEntry, ModelResponse, ModelResponseStatus,
    OllamaServerConfig, OpenAiServerConfig, Prompt, PromptMessage, RetryPolicy,
    StructuredOutputConfig, StructuredOutputType, parse_structured_output,
};
pub use stage::{
    Allocations, BasicStageConfig, ChatDestination, ChatMessage, ChatSenderType,
    ChatStageParticipantAnswer, FlipCardEvent, FlipCardInteraction, FlipCardStageConfig,
    FlipCardStageParticipantAnswer, FlipCardStagePublicData, StageConfig, StageError, StageHeader,
    StageKind, StockpickerParticipantAnswer, StockpickerStageConfig, validate_allocations,
};
