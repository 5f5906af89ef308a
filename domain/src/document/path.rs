//! Hierarchical document paths

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Slash-separated path of a document, e.g.
/// `experiments/e1/participants/p1/stageData/s1`.
///
/// Always an even number of non-empty segments (collection/document pairs).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    fn from_segments(segments: &[&str]) -> Self {
        Self(segments.join("/"))
    }

    /// `experiments/{expId}/stages/{stageId}`
    pub fn stage_config(experiment_id: &str, stage_id: &str) -> Self {
        Self::from_segments(&["experiments", experiment_id, "stages", stage_id])
    }

    /// `experiments/{expId}/participants/{pId}/stageData/{stageId}`
    pub fn participant_stage_data(experiment_id: &str, participant_id: &str, stage_id: &str) -> Self {
        Self::from_segments(&[
            "experiments",
            experiment_id,
            "participants",
            participant_id,
            "stageData",
            stage_id,
        ])
    }

    /// `experiments/{expId}/cohorts/{cohortId}/publicStageData/{stageId}`
    pub fn cohort_public_stage_data(experiment_id: &str, cohort_id: &str, stage_id: &str) -> Self {
        Self::from_segments(&[
            "experiments",
            experiment_id,
            "cohorts",
            cohort_id,
            "publicStageData",
            stage_id,
        ])
    }

    /// `.../participants/{pId}/stageData/{stageId}/privateChats/{msgId}`
    pub fn private_chat(
        experiment_id: &str,
        participant_id: &str,
        stage_id: &str,
        message_id: &str,
    ) -> Self {
        Self(format!(
            "{}/privateChats/{message_id}",
            Self::participant_stage_data(experiment_id, participant_id, stage_id)
        ))
    }

    /// `.../cohorts/{cohortId}/publicStageData/{stageId}/chats/{msgId}`
    pub fn group_chat(experiment_id: &str, cohort_id: &str, stage_id: &str, message_id: &str) -> Self {
        Self(format!(
            "{}/chats/{message_id}",
            Self::cohort_public_stage_data(experiment_id, cohort_id, stage_id)
        ))
    }

    /// `experiments/{expId}/logs/{logId}`
    pub fn model_log(experiment_id: &str, log_id: &str) -> Self {
        Self::from_segments(&["experiments", experiment_id, "logs", log_id])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final segment (the document id)
    pub fn id(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl FromStr for DocumentPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split('/').collect();
        if segments.len() % 2 != 0 || segments.iter().any(|seg| seg.is_empty()) {
            return Err(DomainError::InvalidDocumentPath(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_stage_data() {
        let path = DocumentPath::participant_stage_data("e1", "p1", "s1");
        assert_eq!(path.as_str(), "experiments/e1/participants/p1/stageData/s1");
        assert_eq!(path.id(), "s1");
    }

    #[test]
    fn test_chat_paths() {
        assert_eq!(
            DocumentPath::private_chat("e", "p", "s", "m").as_str(),
            "experiments/e/participants/p/stageData/s/privateChats/m"
        );
        assert_eq!(
            DocumentPath::group_chat("e", "c", "s", "m").as_str(),
            "experiments/e/cohorts/c/publicStageData/s/chats/m"
        );
    }

    #[test]
    fn test_parse_rejects_collection_paths() {
        assert!("experiments/e1/participants".parse::<DocumentPath>().is_err());
        assert!("experiments//stages/s".parse::<DocumentPath>().is_err());
        assert!("experiments/e1/stages/s".parse::<DocumentPath>().is_ok());
    }

    #[test]
    fn test_serde_as_string() {
        let path = DocumentPath::model_log("e", "log1");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"experiments/e/logs/log1\"");
        let back: DocumentPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
