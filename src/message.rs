//! Message types for yuzu's conversation history.
//!
//! A [`Turn`] is one recorded message in the persisted log, stamped with the
//! model and provider active when it was recorded. A [`ChatMessage`] is the
//! `{role, content}` pair sent to a provider.

use serde::{Deserialize, Serialize};

/// The role of a message sender in the conversation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One recorded message in the conversation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    /// RFC 3339 creation time.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub provider: String,
}

/// A message as it appears in a provider request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }
}

impl From<&Turn> for ChatMessage {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}
