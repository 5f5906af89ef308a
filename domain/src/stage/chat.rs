//! Chat messages, chat answers and message routing

use super::StageKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ChatSenderType {
    #[default]
    Participant,
    Mediator,
    Experimenter,
    System,
}

/// One chat message.
///
/// `timestamp` is always replaced by the server time when the message is
/// committed; any client-provided value is discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChatMessage {
    pub id: String,
    #[serde(default)]
    pub sender_type: ChatSenderType,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub sender_name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.timestamp = Some(at);
        self
    }
}

/// Where a message is stored, decided from the stage's kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatDestination {
    /// `participants/{pId}/stageData/{stageId}/privateChats/{msgId}`
    Private,
    /// `cohorts/{cohortId}/publicStageData/{stageId}/chats/{msgId}`
    Group,
}

impl ChatDestination {
    pub fn for_stage(kind: StageKind) -> Self {
        Self::for_kind_name(kind.as_str())
    }

    /// Only `privateChat` stages keep messages per participant; every other
    /// kind, known or not, shares the cohort collection.
    pub fn for_kind_name(kind: &str) -> Self {
        if kind == StageKind::PrivateChat.as_str() {
            ChatDestination::Private
        } else {
            ChatDestination::Group
        }
    }
}

/// Per-participant chat answer; tracks when each discussion was last read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChatStageParticipantAnswer {
    pub id: String,
    pub kind: StageKind,
    #[serde(default)]
    pub discussion_timestamp_map: BTreeMap<String, Option<DateTime<Utc>>>,
}
