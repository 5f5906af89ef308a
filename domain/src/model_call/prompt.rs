//! Prompt value object

use serde::{Deserialize, Serialize};

/// One message of a multi-turn prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl PromptMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// `ROLE(name): content`, or `ROLE: content` without a name
    pub fn render(&self) -> String {
        let role = self.role.to_uppercase();
        match &self.name {
            Some(name) => format!("{role}({name}): {}", self.content),
            None => format!("{role}: {}", self.content),
        }
    }
}

/// Prompt sent to a provider: a single string or an ordered message list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Messages(Vec<PromptMessage>),
}

impl Prompt {
    /// Full prompt text as recorded in the audit log.
    pub fn render(&self) -> String {
        match self {
            Prompt::Text(text) => text.clone(),
            Prompt::Messages(messages) => messages
                .iter()
                .map(PromptMessage::render)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// The prompt as a message list; a plain string becomes one user message.
    pub fn to_messages(&self) -> Vec<PromptMessage> {
        match self {
            Prompt::Text(text) => vec![PromptMessage::user(text.clone())],
            Prompt::Messages(messages) => messages.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Prompt::Text(text) => text.trim().is_empty(),
            Prompt::Messages(messages) => messages.iter().all(|m| m.content.trim().is_empty()),
        }
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<Vec<PromptMessage>> for Prompt {
    fn from(messages: Vec<PromptMessage>) -> Self {
        Prompt::Messages(messages)
    }
}
