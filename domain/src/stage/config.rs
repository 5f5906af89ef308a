//! Stage configuration documents (`experiments/{expId}/stages/{stageId}`)

use super::{FlipCardConfig, StageKind, StockConfig};
use serde::{Deserialize, Serialize};

/// Fields shared by stages whose configuration is irrelevant to actions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStageConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlipCardStageConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cards: Vec<FlipCardConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_cards: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_cards: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockpickerStageConfig {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub stocks: Vec<StockConfig>,
    #[serde(default)]
    pub enable_timeout: bool,
    #[serde(default)]
    pub timeout_seconds: u32,
}

/// The `kind` tag of a stage document, read without decoding the rest.
///
/// Kinds this crate has no config type for (e.g. `election`) still decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHeader {
    pub kind: String,
}

/// A stage configuration, discriminated by its `kind` field.
///
/// Unknown extra fields (descriptions, progress settings, game) are ignored
/// on read since no action depends on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StageConfig {
    #[serde(rename = "info")]
    Info(BasicStageConfig),
    #[serde(rename = "tos")]
    Tos(BasicStageConfig),
    #[serde(rename = "profile")]
    Profile(BasicStageConfig),
    #[serde(rename = "survey")]
    Survey(BasicStageConfig),
    #[serde(rename = "chat")]
    Chat(BasicStageConfig),
    #[serde(rename = "privateChat")]
    PrivateChat(BasicStageConfig),
    #[serde(rename = "flipcard")]
    FlipCard(FlipCardStageConfig),
    #[serde(rename = "stockpicker")]
    Stockpicker(StockpickerStageConfig),
}

impl StageConfig {
    pub fn id(&self) -> &str {
        match self {
            StageConfig::Info(c)
            | StageConfig::Tos(c)
            | StageConfig::Profile(c)
            | StageConfig::Survey(c)
            | StageConfig::Chat(c)
            | StageConfig::PrivateChat(c) => &c.id,
            StageConfig::FlipCard(c) => &c.id,
            StageConfig::Stockpicker(c) => &c.id,
        }
    }

    pub fn kind(&self) -> StageKind {
        match self {
            StageConfig::Info(_) => StageKind::Info,
            StageConfig::Tos(_) => StageKind::Tos,
            StageConfig::Profile(_) => StageKind::Profile,
            StageConfig::Survey(_) => StageKind::Survey,
            StageConfig::Chat(_) => StageKind::Chat,
            StageConfig::PrivateChat(_) => StageKind::PrivateChat,
            StageConfig::FlipCard(_) => StageKind::FlipCard,
            StageConfig::Stockpicker(_) => StageKind::Stockpicker,
        }
    }
}
