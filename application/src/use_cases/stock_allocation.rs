//! Stock allocation use cases: set a pending allocation, then confirm it.
//!
//! Both endpoints require the caller to pass the configured [`AuthGuard`].

use crate::ports::auth_guard::{AuthGuard, CallerIdentity};
use crate::ports::document_store::{Snapshot, TransactionError, WriteBatch};
use crate::use_cases::actions::{
    ActionError, ActionResponse, ConfirmStockAllocationData, SetStockAllocationData,
};
use crate::use_cases::stage_transaction::StageTransactionCoordinator;
use delib_domain::{
    DocumentPath, StageError, StageKind, StockpickerParticipantAnswer, validate_allocations,
};
use std::sync::Arc;
use tracing::info;

pub struct StockAllocationUseCase {
    coordinator: Arc<StageTransactionCoordinator>,
    guard: Arc<dyn AuthGuard>,
}

/// Existing allocation answer, rejecting documents written by another stage kind.
fn read_answer(
    snapshot: &Snapshot,
    path: &DocumentPath,
    stage_id: &str,
) -> Result<Option<StockpickerParticipantAnswer>, TransactionError> {
    let existing = snapshot.read::<StockpickerParticipantAnswer>(path)?;
    if let Some(answer) = &existing
        && answer.kind != StageKind::Stockpicker
    {
        return Err(StageError::WrongStageKind {
            stage_id: stage_id.to_string(),
            expected: StageKind::Stockpicker,
            found: answer.kind,
        }
        .into());
    }
    Ok(existing)
}

impl StockAllocationUseCase {
    pub fn new(coordinator: Arc<StageTransactionCoordinator>, guard: Arc<dyn AuthGuard>) -> Self {
        Self { coordinator, guard }
    }

    /// `NONE | PENDING -> PENDING`.
    ///
    /// Allocations must be finite and sum to 100 (±0.01); the check runs
    /// before the store is touched.
    pub async fn set_allocation(
        &self,
        caller: &CallerIdentity,
        data: SetStockAllocationData,
    ) -> Result<ActionResponse, ActionError> {
        self.guard.authorize(caller)?;
        data.validate()?;
        validate_allocations(&data.allocations)?;

        let path =
            DocumentPath::participant_stage_data(&data.experiment_id, &data.participant_id, &data.stage_id);

        self.coordinator
            .commit(&[path.clone()], |snapshot| {
                let existing = read_answer(snapshot, &path, &data.stage_id)?;
                let answer = StockpickerParticipantAnswer::set_allocations(
                    existing,
                    &data.stage_id,
                    data.allocations.clone(),
                )?;
                let mut batch = WriteBatch::new();
                batch.set(path.clone(), &answer)?;
                Ok((batch, ()))
            })
            .await?;

        info!(
            experiment_id = %data.experiment_id,
            stage_id = %data.stage_id,
            stocks = data.allocations.len(),
            "Stock allocation set"
        );
        Ok(ActionResponse::success())
    }

    /// `PENDING -> CONFIRMED`. Terminal: a confirmed answer never changes again.
    pub async fn confirm_allocation(
        &self,
        caller: &CallerIdentity,
        data: ConfirmStockAllocationData,
    ) -> Result<ActionResponse, ActionError> {
        self.guard.authorize(caller)?;
        data.validate()?;

        let path =
            DocumentPath::participant_stage_data(&data.experiment_id, &data.participant_id, &data.stage_id);

        self.coordinator
            .commit(&[path.clone()], |snapshot| {
                let existing = read_answer(snapshot, &path, &data.stage_id)?;
                let answer = StockpickerParticipantAnswer::confirm(existing)?;
                let mut batch = WriteBatch::new();
                batch.set(path.clone(), &answer)?;
                Ok((batch, ()))
            })
            .await?;

        info!(
            experiment_id = %data.experiment_id,
            stage_id = %data.stage_id,
            "Stock allocation confirmed"
        );
        Ok(ActionResponse::success())
    }
}
