//! Stock-picker stage: stock configs and the allocation answer state machine
//!
//! An allocation answer moves `NONE -> PENDING -> CONFIRMED`. `CONFIRMED`
//! is terminal.

use super::{StageError, StageKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Even split between two stocks
pub const DEFAULT_ALLOCATION: f64 = 50.0;

/// Absolute tolerance on the allocation total
pub const ALLOCATION_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMetrics {
    pub best_year_performance: String,
    pub worst_year_performance: String,
    pub analyst_consensus: String,
    pub social_media_hype: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPerformance {
    pub month: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockConfig {
    pub id: String,
    pub name: String,
    pub ticker: String,
    pub metrics: StockMetrics,
    #[serde(default)]
    pub historical_performance: Vec<MonthlyPerformance>,
    #[serde(default)]
    pub risk_analysis: String,
}

/// Stock id to allocation percentage
pub type Allocations = BTreeMap<String, f64>;

/// Check that every value is finite and the total is 100 within tolerance.
pub fn validate_allocations(allocations: &Allocations) -> Result<(), StageError> {
    if let Some((stock_id, _)) = allocations.iter().find(|(_, v)| !v.is_finite()) {
        return Err(StageError::NonFiniteAllocation {
            stock_id: stock_id.clone(),
        });
    }
    let total: f64 = allocations.values().sum();
    if (total - 100.0).abs() > ALLOCATION_TOLERANCE {
        return Err(StageError::InvalidAllocation { total });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationState {
    None,
    Pending,
    Confirmed,
}

/// Stored at `participants/{pId}/stageData/{stageId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockpickerParticipantAnswer {
    pub id: String,
    pub kind: StageKind,
    #[serde(default)]
    pub allocations: Allocations,
    #[serde(default)]
    pub confirmed: bool,
}

impl StockpickerParticipantAnswer {
    pub fn state(answer: Option<&Self>) -> AllocationState {
        match answer {
            None => AllocationState::None,
            Some(a) if a.confirmed => AllocationState::Confirmed,
            Some(a) if a.allocations.is_empty() => AllocationState::None,
            Some(_) => AllocationState::Pending,
        }
    }

    /// `NONE | PENDING -> PENDING`; rejected once confirmed.
    pub fn set_allocations(
        existing: Option<Self>,
        stage_id: &str,
        allocations: Allocations,
    ) -> Result<Self, StageError> {
        validate_allocations(&allocations)?;
        if Self::state(existing.as_ref()) == AllocationState::Confirmed {
            return Err(StageError::AlreadyConfirmed);
        }
        Ok(Self {
            id: stage_id.to_string(),
            kind: StageKind::Stockpicker,
            allocations,
            confirmed: false,
        })
    }

    /// `PENDING -> CONFIRMED`
    pub fn confirm(existing: Option<Self>) -> Result<Self, StageError> {
        match Self::state(existing.as_ref()) {
            AllocationState::None => Err(StageError::NoAllocation),
            AllocationState::Confirmed => Err(StageError::AlreadyConfirmed),
            AllocationState::Pending => {
                let mut answer = existing.ok_or(StageError::NoAllocation)?;
                answer.confirmed = true;
                Ok(answer)
            }
        }
    }
}
