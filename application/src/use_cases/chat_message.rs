//! Chat message use cases
//!
//! - [`CreateChatMessageUseCase`] routes a message to the private or the
//!   group collection of a chat stage
//! - [`UpdateChatParticipantAnswerUseCase`] stores a participant's chat answer

use crate::ports::clock::Clock;
use crate::ports::document_store::WriteBatch;
use crate::use_cases::actions::{
    ActionError, ActionResponse, CreateChatMessageData, UpdateChatStageParticipantAnswerData,
};
use crate::use_cases::shared::random_delay;
use crate::use_cases::stage_transaction::StageTransactionCoordinator;
use delib_domain::{ChatDestination, DocumentPath, StageError, StageHeader};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub struct CreateChatMessageUseCase {
    coordinator: Arc<StageTransactionCoordinator>,
    clock: Arc<dyn Clock>,
}

impl CreateChatMessageUseCase {
    pub fn new(coordinator: Arc<StageTransactionCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    /// Write the message, keyed by its own id, to exactly one destination.
    ///
    /// The stage configuration is read inside the same transaction, so the
    /// routing decision never uses a stale stage kind. Re-sending a message
    /// id overwrites the same document.
    pub async fn execute(&self, data: CreateChatMessageData) -> Result<ActionResponse, ActionError> {
        data.validate()?;

        let stage_path = DocumentPath::stage_config(&data.experiment_id, &data.stage_id);
        let message = data.chat_message.clone().stamped(self.clock.now());

        let (destination, path) = self
            .coordinator
            .commit(&[stage_path.clone()], |snapshot| {
                let stage: StageHeader =
                    snapshot
                        .read(&stage_path)?
                        .ok_or_else(|| StageError::StageNotFound {
                            stage_id: data.stage_id.clone(),
                        })?;

                let destination = ChatDestination::for_kind_name(&stage.kind);
                let path = match destination {
                    ChatDestination::Private => DocumentPath::private_chat(
                        &data.experiment_id,
                        &data.participant_id,
                        &data.stage_id,
                        &message.id,
                    ),
                    ChatDestination::Group => DocumentPath::group_chat(
                        &data.experiment_id,
                        &data.cohort_id,
                        &data.stage_id,
                        &message.id,
                    ),
                };

                let mut batch = WriteBatch::new();
                batch.set(path.clone(), &message)?;
                Ok((batch, (destination, path)))
            })
            .await?;

        info!(
            experiment_id = %data.experiment_id,
            stage_id = %data.stage_id,
            message_id = %message.id,
            destination = ?destination,
            "Chat message written"
        );
        Ok(ActionResponse::created(path.id()))
    }
}

pub struct UpdateChatParticipantAnswerUseCase {
    coordinator: Arc<StageTransactionCoordinator>,
    clock: Arc<dyn Clock>,
    jitter_max: Duration,
}

impl UpdateChatParticipantAnswerUseCase {
    pub fn new(
        coordinator: Arc<StageTransactionCoordinator>,
        clock: Arc<dyn Clock>,
        jitter_max: Duration,
    ) -> Self {
        Self {
            coordinator,
            clock,
            jitter_max,
        }
    }

    /// Store the answer at `participants/{privateId}/stageData/{answer.id}`.
    ///
    /// Waits a random `0..=jitter_max` first so participants updating their
    /// answers at the same moment do not all hit the store together.
    pub async fn execute(
        &self,
        data: UpdateChatStageParticipantAnswerData,
    ) -> Result<ActionResponse, ActionError> {
        data.validate()?;

        let answer = &data.chat_stage_participant_answer;
        let path = DocumentPath::participant_stage_data(
            &data.experiment_id,
            &data.participant_private_id,
            &answer.id,
        );

        let delay = random_delay(self.jitter_max);
        debug!(delay_ms = delay.as_millis() as u64, "Delaying chat answer commit");
        self.clock.sleep(delay).await;

        self.coordinator
            .commit(&[], |_| {
                let mut batch = WriteBatch::new();
                batch.set(path.clone(), answer)?;
                Ok((batch, ()))
            })
            .await?;

        Ok(ActionResponse::created(path.id()))
    }
}
