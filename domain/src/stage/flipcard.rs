//! Flip-card stage: configs, interaction history and cohort selections

use super::StageKind;
use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipCardConfig {
    pub id: String,
    pub title: String,
    pub front_content: String,
    pub back_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipCardEvent {
    Flip,
    Select,
    Confirm,
}

impl FlipCardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlipCardEvent::Flip => "flip",
            FlipCardEvent::Select => "select",
            FlipCardEvent::Confirm => "confirm",
        }
    }
}

impl fmt::Display for FlipCardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FlipCardEvent {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flip" => Ok(FlipCardEvent::Flip),
            "select" => Ok(FlipCardEvent::Select),
            "confirm" => Ok(FlipCardEvent::Confirm),
            other => Err(DomainError::UnknownFlipCardEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipCardInteraction {
    pub event_type: FlipCardEvent,
    pub card_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Stored at `participants/{pId}/stageData/{stageId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipCardStageParticipantAnswer {
    pub id: String,
    pub kind: StageKind,
    pub selected_card_id: Option<String>,
    #[serde(default)]
    pub interactions: Vec<FlipCardInteraction>,
}

impl FlipCardStageParticipantAnswer {
    pub fn new(stage_id: impl Into<String>) -> Self {
        Self {
            id: stage_id.into(),
            kind: StageKind::FlipCard,
            selected_card_id: None,
            interactions: Vec::new(),
        }
    }

    /// Record one interaction.
    ///
    /// Returns the card id to publish to the cohort when the event confirms
    /// the current selection; `None` otherwise.
    pub fn apply(
        &mut self,
        event_type: FlipCardEvent,
        card_id: &str,
        at: DateTime<Utc>,
    ) -> Option<String> {
        self.interactions.push(FlipCardInteraction {
            event_type,
            card_id: card_id.to_string(),
            timestamp: at,
        });

        match event_type {
            FlipCardEvent::Select => {
                self.selected_card_id = Some(card_id.to_string());
                None
            }
            FlipCardEvent::Confirm if self.selected_card_id.as_deref() == Some(card_id) => {
                self.selected_card_id.clone()
            }
            _ => None,
        }
    }
}

/// Stored at `cohorts/{cohortId}/publicStageData/{stageId}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipCardStagePublicData {
    pub id: String,
    pub kind: StageKind,
    #[serde(default)]
    pub participant_selections: BTreeMap<String, String>,
}

impl FlipCardStagePublicData {
    pub fn new(stage_id: impl Into<String>) -> Self {
        Self {
            id: stage_id.into(),
            kind: StageKind::FlipCard,
            participant_selections: BTreeMap::new(),
        }
    }

    pub fn record_selection(&mut self, participant_id: impl Into<String>, card_id: impl Into<String>) {
        self.participant_selections
            .insert(participant_id.into(), card_id.into());
    }
}
