//! Set flip-card interaction use case

use crate::ports::clock::Clock;
use crate::ports::document_store::WriteBatch;
use crate::use_cases::actions::{ActionError, ActionResponse, SetFlipCardInteractionData};
use crate::use_cases::stage_transaction::StageTransactionCoordinator;
use delib_domain::{
    DocumentPath, FlipCardStageParticipantAnswer, FlipCardStagePublicData, StageError, StageKind,
};
use std::sync::Arc;
use tracing::info;

pub struct SetFlipCardInteractionUseCase {
    coordinator: Arc<StageTransactionCoordinator>,
    clock: Arc<dyn Clock>,
}

impl SetFlipCardInteractionUseCase {
    pub fn new(coordinator: Arc<StageTransactionCoordinator>, clock: Arc<dyn Clock>) -> Self {
        Self { coordinator, clock }
    }

    /// Append the interaction to the participant's history and, when it
    /// confirms the current selection, publish the selection to the cohort.
    ///
    /// Both documents are part of one commit. The cohort document is
    /// multi-writer and is only ever updated from inside that commit.
    pub async fn execute(
        &self,
        data: SetFlipCardInteractionData,
    ) -> Result<ActionResponse, ActionError> {
        data.validate()?;

        let participant_path = DocumentPath::participant_stage_data(
            &data.experiment_id,
            &data.participant_id,
            &data.stage_id,
        );
        let public_path =
            DocumentPath::cohort_public_stage_data(&data.experiment_id, &data.cohort_id, &data.stage_id);
        let now = self.clock.now();

        let published = self
            .coordinator
            .commit(&[participant_path.clone(), public_path.clone()], |snapshot| {
                let mut answer = snapshot
                    .read::<FlipCardStageParticipantAnswer>(&participant_path)?
                    .unwrap_or_else(|| FlipCardStageParticipantAnswer::new(&data.stage_id));
                if answer.kind != StageKind::FlipCard {
                    return Err(StageError::WrongStageKind {
                        stage_id: data.stage_id.clone(),
                        expected: StageKind::FlipCard,
                        found: answer.kind,
                    }
                    .into());
                }

                let published = answer.apply(data.event_type, &data.card_id, now);

                let mut batch = WriteBatch::new();
                batch.set(participant_path.clone(), &answer)?;

                if let Some(card_id) = &published {
                    let mut public = snapshot
                        .read::<FlipCardStagePublicData>(&public_path)?
                        .unwrap_or_else(|| FlipCardStagePublicData::new(&data.stage_id));
                    public.record_selection(&data.participant_id, card_id);
                    batch.set(public_path.clone(), &public)?;
                }

                Ok((batch, published))
            })
            .await?;

        info!(
            experiment_id = %data.experiment_id,
            stage_id = %data.stage_id,
            event = %data.event_type,
            card_id = %data.card_id,
            published = published.is_some(),
            "Flip card interaction recorded"
        );
        Ok(ActionResponse::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::actions::ActionErrorCode;
    use crate::use_cases::test_support::{FakeClock, FakeDocumentStore};
    use delib_domain::{FlipCardEvent, StockpickerParticipantAnswer};
    use std::collections::BTreeMap;

    fn setup() -> (Arc<FakeDocumentStore>, SetFlipCardInteractionUseCase) {
        let store = Arc::new(FakeDocumentStore::default());
        let coordinator = Arc::new(StageTransactionCoordinator::new(store.clone()));
        let uc = SetFlipCardInteractionUseCase::new(coordinator, Arc::new(FakeClock::new()));
        (store, uc)
    }

    fn data(participant: &str, event_type: FlipCardEvent, card_id: &str) -> SetFlipCardInteractionData {
        SetFlipCardInteractionData {
            experiment_id: "exp".to_string(),
            cohort_id: "cohort".to_string(),
            stage_id: "cards".to_string(),
            participant_id: participant.to_string(),
            event_type,
            card_id: card_id.to_string(),
        }
    }

    fn answer(store: &FakeDocumentStore, participant: &str) -> FlipCardStageParticipantAnswer {
        let doc = store
            .document(&DocumentPath::participant_stage_data("exp", participant, "cards"))
            .unwrap();
        serde_json::from_value(doc).unwrap()
    }

    fn public(store: &FakeDocumentStore) -> Option<FlipCardStagePublicData> {
        store
            .document(&DocumentPath::cohort_public_stage_data("exp", "cohort", "cards"))
            .map(|doc| serde_json::from_value(doc).unwrap())
    }

    #[tokio::test]
    async fn test_first_interaction_creates_answer() {
        let (store, uc) = setup();

        let response = uc.execute(data("p1", FlipCardEvent::Flip, "a")).await.unwrap();

        assert_eq!(response, ActionResponse::success());
        let answer = answer(&store, "p1");
        assert_eq!(answer.interactions.len(), 1);
        assert_eq!(answer.selected_card_id, None);
        assert!(public(&store).is_none());
    }

    #[tokio::test]
    async fn test_select_then_confirm_publishes_selection() {
        let (store, uc) = setup();

        uc.execute(data("p1", FlipCardEvent::Select, "a")).await.unwrap();
        uc.execute(data("p1", FlipCardEvent::Confirm, "a")).await.unwrap();

        let public = public(&store).unwrap();
        assert_eq!(
            public.participant_selections,
            BTreeMap::from([("p1".to_string(), "a".to_string())])
        );
        assert_eq!(answer(&store, "p1").interactions.len(), 2);
    }

    #[tokio::test]
    async fn test_confirm_of_superseded_card_not_published() {
        let (store, uc) = setup();

        uc.execute(data("p1", FlipCardEvent::Select, "a")).await.unwrap();
        uc.execute(data("p1", FlipCardEvent::Select, "b")).await.unwrap();
        uc.execute(data("p1", FlipCardEvent::Confirm, "a")).await.unwrap();

        let answer = answer(&store, "p1");
        assert_eq!(answer.selected_card_id.as_deref(), Some("b"));
        assert_eq!(answer.interactions.len(), 3);
        assert!(public(&store).is_none());
    }

    #[tokio::test]
    async fn test_confirm_keeps_other_participants_selections() {
        let (store, uc) = setup();

        for (participant, card) in [("p1", "a"), ("p2", "b")] {
            uc.execute(data(participant, FlipCardEvent::Select, card)).await.unwrap();
            uc.execute(data(participant, FlipCardEvent::Confirm, card)).await.unwrap();
        }

        let selections = public(&store).unwrap().participant_selections;
        assert_eq!(selections.len(), 2);
        assert_eq!(selections["p2"], "b");
    }

    #[tokio::test]
    async fn test_answer_of_other_stage_kind_rejected() {
        let (store, uc) = setup();
        let existing = StockpickerParticipantAnswer {
            id: "cards".to_string(),
            kind: StageKind::Stockpicker,
            allocations: BTreeMap::new(),
            confirmed: false,
        };
        store.insert(
            DocumentPath::participant_stage_data("exp", "p1", "cards"),
            &existing,
        );

        let err = uc
            .execute(data("p1", FlipCardEvent::Select, "a"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ActionErrorCode::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_empty_card_id_rejected() {
        let (store, uc) = setup();

        let err = uc.execute(data("p1", FlipCardEvent::Select, "")).await.unwrap_err();

        assert_eq!(err.code, ActionErrorCode::InvalidArgument);
        assert_eq!(store.transactions(), 0);
    }
}
