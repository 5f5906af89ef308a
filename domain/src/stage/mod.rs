//! Experiment stages: configurations, per-participant answers, per-cohort
//! public data, and the rules that move them between states.

pub mod chat;
pub mod config;
pub mod error;
pub mod flipcard;
pub mod kind;
pub mod stockpicker;

pub use chat::{ChatDestination, ChatMessage, ChatSenderType, ChatStageParticipantAnswer};
pub use config::{
    BasicStageConfig, FlipCardStageConfig, StageConfig, StageHeader, StockpickerStageConfig,
};
pub use error::StageError;
pub use flipcard::{
    FlipCardConfig, FlipCardEvent, FlipCardInteraction, FlipCardStageParticipantAnswer,
    FlipCardStagePublicData,
};
pub use kind::StageKind;
pub use stockpicker::{
    ALLOCATION_TOLERANCE, AllocationState, Allocations, DEFAULT_ALLOCATION, MonthlyPerformance,
    StockConfig, StockMetrics, StockpickerParticipantAnswer, validate_allocations,
};
