//! Stage kinds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind tag carried by every stage config, answer and public data document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKind {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "tos")]
    Tos,
    #[serde(rename = "profile")]
    Profile,
    #[serde(rename = "survey")]
    Survey,
    #[serde(rename = "chat")]
    Chat,
    #[serde(rename = "privateChat")]
    PrivateChat,
    #[serde(rename = "flipcard")]
    FlipCard,
    #[serde(rename = "stockpicker")]
    Stockpicker,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Info => "info",
            StageKind::Tos => "tos",
            StageKind::Profile => "profile",
            StageKind::Survey => "survey",
            StageKind::Chat => "chat",
            StageKind::PrivateChat => "privateChat",
            StageKind::FlipCard => "flipcard",
            StageKind::Stockpicker => "stockpicker",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_display() {
        for kind in [
            StageKind::Info,
            StageKind::Tos,
            StageKind::Profile,
            StageKind::Survey,
            StageKind::Chat,
            StageKind::PrivateChat,
            StageKind::FlipCard,
            StageKind::Stockpicker,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }
}
