//! Append-only audit record of one provider attempt

use super::{ModelCallContext, ModelResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record per attempt, written once and never updated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelLogEntry {
    pub id: String,
    pub experiment_id: String,
    pub cohort_id: String,
    pub participant_id: String,
    pub stage_id: String,
    pub public_id: String,
    pub private_id: String,
    pub description: String,
    pub prompt: String,
    pub created_timestamp: DateTime<Utc>,
    pub query_timestamp: Option<DateTime<Utc>>,
    pub response_timestamp: Option<DateTime<Utc>>,
    pub response: ModelResponse,
}

impl ModelLogEntry {
    /// Entry for `attempt`, pre-populated before the provider is queried.
    pub fn for_attempt(
        id: impl Into<String>,
        context: &ModelCallContext,
        attempt: u32,
        prompt: impl Into<String>,
        created_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            experiment_id: context.experiment_id.clone(),
            cohort_id: context.cohort_id.clone(),
            participant_id: context.participant_id.clone(),
            stage_id: context.stage_id.clone(),
            public_id: context.public_id.clone(),
            private_id: context.private_id.clone(),
            description: context.attempt_description(attempt),
            prompt: prompt.into(),
            created_timestamp,
            query_timestamp: None,
            response_timestamp: None,
            response: ModelResponse::none(),
        }
    }

    /// Attach the provider outcome and its timing.
    pub fn record_response(
        &mut self,
        response: ModelResponse,
        query_timestamp: DateTime<Utc>,
        response_timestamp: DateTime<Utc>,
    ) {
        self.response = response;
        self.query_timestamp = Some(query_timestamp);
        self.response_timestamp = Some(response_timestamp);
    }
}
