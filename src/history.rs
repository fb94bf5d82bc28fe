//! Persisted profile and conversation history documents.
//!
//! Both are pretty-printed JSON rewritten in full on every save. The history
//! is bounded by [`HISTORY_LIMIT`](crate::constants::HISTORY_LIMIT), so a full
//! rewrite stays small.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChatError, ChatResult};
use crate::message::Turn;

/// Current provider and model, rewritten whenever either changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub last_updated: String,
}

/// Metadata block at the top of the history document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryMetadata {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub total_messages: usize,
    #[serde(default)]
    pub current_model: String,
    #[serde(default)]
    pub current_provider: String,
}

/// The full history file: metadata plus the capped turn sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HistoryDocument {
    #[serde(default)]
    pub metadata: HistoryMetadata,
    #[serde(default)]
    pub conversations: Vec<Turn>,
}

/// Current time as RFC 3339, second precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Profile {
    pub fn new(provider: &str, model: &str) -> Self {
        Self {
            model: model.to_string(),
            provider: provider.to_string(),
            last_updated: now_rfc3339(),
        }
    }

    /// Reads the profile; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> ChatResult<Option<Self>> {
        read_json(path, "profile")
    }

    pub fn save(&self, path: &Path) -> ChatResult<()> {
        write_json(path, self, "profile")
    }
}

impl HistoryDocument {
    pub fn new(turns: &[Turn], provider: &str, model: &str) -> Self {
        Self {
            metadata: HistoryMetadata {
                last_updated: now_rfc3339(),
                total_messages: turns.len(),
                current_model: model.to_string(),
                current_provider: provider.to_string(),
            },
            conversations: turns.to_vec(),
        }
    }

    /// Reads the history; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> ChatResult<Option<Self>> {
        read_json(path, "history")
    }

    pub fn save(&self, path: &Path) -> ChatResult<()> {
        write_json(path, self, "history")
    }

    /// Deletes the history file. Absence is not an error.
    pub fn remove(path: &Path) -> ChatResult<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ChatError::io("error removing history file", err)),
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> ChatResult<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(ChatError::io(format!("error loading {what}"), err)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|err| ChatError::io(format!("error parsing {what}"), err.into()))
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> ChatResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| ChatError::io(format!("error marshaling {what}"), err.into()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|err| ChatError::io(format!("error creating {}", parent.display()), err))?;
    }
    fs::write(path, json).map_err(|err| ChatError::io(format!("error saving {what}"), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn turn(role: Role, content: &str) -> Turn {
        Turn {
            role,
            content: content.to_string(),
            timestamp: now_rfc3339(),
            model: "m".into(),
            provider: "p".into(),
        }
    }

    #[test]
    fn test_missing_files_load_as_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Profile::load(&dir.path().join("profile.json")).unwrap().is_none());
        assert!(HistoryDocument::load(&dir.path().join("h.json")).unwrap().is_none());
    }

    #[test]
    fn test_history_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        let turns = vec![turn(Role::User, "hi"), turn(Role::Assistant, "hello")];
        HistoryDocument::new(&turns, "cerebras", "gpt-oss-120b")
            .save(&path)
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["metadata"]["total_messages"], 2);
        assert_eq!(raw["metadata"]["current_provider"], "cerebras");
        assert_eq!(raw["metadata"]["current_model"], "gpt-oss-120b");
        assert!(raw["metadata"]["last_updated"].is_string());
        assert_eq!(raw["conversations"][0]["role"], "user");
        assert_eq!(raw["conversations"][1]["content"], "hello");
        assert_eq!(raw["conversations"][1]["provider"], "p");

        let loaded = HistoryDocument::load(&path).unwrap().unwrap();
        assert_eq!(loaded.conversations, turns);
    }

    #[test]
    fn test_profile_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        Profile::new("openrouter", "deepseek/r1:free").save(&path).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["provider"], "openrouter");
        assert_eq!(raw["model"], "deepseek/r1:free");
        assert!(raw["last_updated"].is_string());
    }

    #[test]
    fn test_malformed_history_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            HistoryDocument::load(&path),
            Err(ChatError::Io { .. })
        ));
    }

    #[test]
    fn test_remove_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HistoryDocument::remove(&dir.path().join("chat_history.json")).is_ok());
    }
}
