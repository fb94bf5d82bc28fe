//! Session state for yuzu.
//!
//! A [`Session`] owns the provider registry, the current provider and model,
//! the system prompt, and the bounded conversation log. It persists to three
//! files under the data directory: `profile.json`, `chat_history.json`, and
//! the plain-text `system.txt`.
//!
//! The session is an explicit value owned by the REPL and passed by `&mut`
//! to every operation; all provider mutation goes through it, so a key can
//! never be rotated while a request built from it is in flight.

use std::fs;
use std::io;

use tracing::{debug, info, warn};

use crate::config::SessionPaths;
use crate::constants::{DEFAULT_MODEL, DEFAULT_PROVIDER, HISTORY_LIMIT};
use crate::error::{ChatError, ChatResult};
use crate::history::{now_rfc3339, HistoryDocument, Profile};
use crate::message::{Role, Turn};
use crate::provider::{Provider, ProviderKind, ProviderRegistry};

/// Read-only snapshot for the status display.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub provider: Option<ProviderKind>,
    pub model: String,
    pub system_prompt_lines: usize,
    pub exchanges: usize,
    pub enabled_providers: usize,
    pub total_providers: usize,
    pub context_chars: usize,
}

/// The active conversation and its provider selection.
pub struct Session {
    registry: ProviderRegistry,
    provider: Option<ProviderKind>,
    model: String,
    system_prompt: String,
    turns: Vec<Turn>,
    paths: SessionPaths,
}

impl Session {
    /// Restores a session from the data directory.
    ///
    /// Missing files mean a first run. Unreadable or malformed files are
    /// reported and replaced by defaults. If the restored provider is not
    /// enabled, the first enabled provider takes over.
    pub fn load(paths: SessionPaths, registry: ProviderRegistry) -> Self {
        let mut provider_id = DEFAULT_PROVIDER.to_string();
        let mut model = DEFAULT_MODEL.to_string();
        match Profile::load(&paths.profile) {
            Ok(Some(profile)) => {
                if !profile.model.is_empty() {
                    model = profile.model;
                }
                if !profile.provider.is_empty() {
                    provider_id = profile.provider;
                }
                info!(provider = %provider_id, model = %model, "profile loaded");
            }
            Ok(None) => debug!("no profile found, starting with default settings"),
            Err(err) => warn!("{err}"),
        }

        let turns = match HistoryDocument::load(&paths.history) {
            Ok(Some(doc)) => {
                let mut turns = doc.conversations;
                truncate_to_limit(&mut turns);
                info!(messages = turns.len(), "history loaded");
                turns
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("{err}");
                Vec::new()
            }
        };

        let mut session = Self {
            registry,
            provider: None,
            model,
            system_prompt: String::new(),
            turns,
            paths,
        };
        if let Err(err) = session.reload_system_prompt() {
            warn!("{err}");
        }

        match provider_id.parse::<ProviderKind>() {
            Ok(kind) if session.registry.is_enabled(kind) => session.provider = Some(kind),
            _ => {
                if let Some(fallback) = session.registry.first_enabled_except(None) {
                    info!(
                        from = %provider_id,
                        to = fallback.id(),
                        "restored provider unavailable, failing over"
                    );
                    session.select(fallback);
                }
            }
        }
        session
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    pub fn current_provider(&self) -> Option<ProviderKind> {
        self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The provider a message would be sent to.
    pub fn active_provider(&self) -> ChatResult<&Provider> {
        let kind = self.provider.ok_or(ChatError::NoProvider)?;
        let provider = self.registry.get(kind);
        if !provider.is_enabled() {
            return Err(ChatError::ProviderDisabled {
                provider: kind.id().to_string(),
                key_file: kind.spec().key_file,
            });
        }
        Ok(provider)
    }

    /// Enabled providers, in registry order.
    pub fn list_enabled(&self) -> Vec<ProviderKind> {
        self.registry.list_enabled()
    }

    /// Models of the current provider; empty when providerless.
    pub fn list_models(&self) -> &'static [&'static str] {
        self.provider
            .map(|kind| self.registry.models_of(kind))
            .unwrap_or(&[])
    }

    /// Switches provider and resets the model to its first catalog entry.
    ///
    /// Unknown or disabled providers leave the session unchanged.
    pub fn switch_provider(&mut self, id: &str) -> ChatResult<ProviderKind> {
        let kind: ProviderKind = id.parse()?;
        if !self.registry.is_enabled(kind) {
            return Err(ChatError::ProviderDisabled {
                provider: kind.id().to_string(),
                key_file: kind.spec().key_file,
            });
        }
        self.select(kind);
        self.save_profile();
        Ok(kind)
    }

    /// Selects the first model of the current provider whose id contains
    /// `fragment`, ignoring case.
    pub fn switch_model(&mut self, fragment: &str) -> ChatResult<&'static str> {
        let needle = fragment.to_lowercase();
        let found = self
            .list_models()
            .iter()
            .copied()
            .find(|model| model.to_lowercase().contains(&needle))
            .ok_or_else(|| ChatError::ModelNotFound(fragment.to_string()))?;
        self.model = found.to_string();
        self.save_profile();
        Ok(found)
    }

    /// Stores a credential. A providerless session adopts the provider.
    pub fn set_key(&mut self, id: &str, secret: &str) -> ChatResult<ProviderKind> {
        if secret.is_empty() {
            return Err(ChatError::EmptyCredential);
        }
        let kind: ProviderKind = id.parse()?;
        self.registry.set_key(kind, secret)?;
        if self.provider.is_none() {
            self.select(kind);
            self.save_profile();
        }
        Ok(kind)
    }

    /// Deletes a credential. If it belonged to the current provider, the
    /// first other enabled provider takes over, or the session is left
    /// providerless.
    pub fn remove_key(&mut self, id: &str) -> ChatResult<ProviderKind> {
        let kind: ProviderKind = id.parse()?;
        self.registry.remove_key(kind)?;
        if self.provider == Some(kind) {
            match self.registry.first_enabled_except(Some(kind)) {
                Some(fallback) => {
                    info!(from = kind.id(), to = fallback.id(), "current provider disabled, failing over");
                    self.select(fallback);
                    self.save_profile();
                }
                None => {
                    info!(provider = kind.id(), "current provider disabled, none left");
                    self.provider = None;
                    self.save_profile();
                }
            }
        }
        Ok(kind)
    }

    /// Writes a new system prompt to `system.txt` and adopts it.
    pub fn set_system_prompt(&mut self, text: &str) -> ChatResult<()> {
        let path = &self.paths.system_prompt;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| ChatError::io(format!("failed to create {}", parent.display()), err))?;
        }
        fs::write(path, text)
            .map_err(|err| ChatError::io("failed to save system prompt", err))?;
        self.system_prompt = text.to_string();
        Ok(())
    }

    /// Re-reads `system.txt`. A missing file means no system prompt.
    pub fn reload_system_prompt(&mut self) -> ChatResult<()> {
        match fs::read_to_string(&self.paths.system_prompt) {
            Ok(text) => {
                self.system_prompt = text;
                debug!(
                    lines = line_count(&self.system_prompt),
                    chars = self.system_prompt.chars().count(),
                    "system prompt loaded"
                );
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.system_prompt.clear();
                Ok(())
            }
            Err(err) => Err(ChatError::io("error loading system prompt", err)),
        }
    }

    /// Appends a turn stamped with the current model and provider, enforces
    /// the history cap, and rewrites the history document.
    pub fn record_turn(&mut self, role: Role, content: &str) -> ChatResult<()> {
        self.turns.push(Turn {
            role,
            content: content.to_string(),
            timestamp: now_rfc3339(),
            model: self.model.clone(),
            provider: self.provider_id().to_string(),
        });
        truncate_to_limit(&mut self.turns);
        self.save_history()
    }

    /// Deletes the history document, then empties the log. A failed delete
    /// leaves the log as it was.
    pub fn clear_history(&mut self) -> ChatResult<()> {
        HistoryDocument::remove(&self.paths.history)?;
        self.turns.clear();
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            provider: self.provider,
            model: self.model.clone(),
            system_prompt_lines: line_count(&self.system_prompt),
            exchanges: self.turns.len() / 2,
            enabled_providers: self.registry.enabled_count(),
            total_providers: self.registry.len(),
            context_chars: self.turns.iter().map(|t| t.content.chars().count()).sum(),
        }
    }

    fn select(&mut self, kind: ProviderKind) {
        self.provider = Some(kind);
        if let Some(first) = self.registry.models_of(kind).first() {
            self.model = first.to_string();
        }
    }

    fn provider_id(&self) -> &'static str {
        self.provider.map(ProviderKind::id).unwrap_or("")
    }

    fn save_profile(&self) {
        let profile = Profile::new(self.provider_id(), &self.model);
        if let Err(err) = profile.save(&self.paths.profile) {
            warn!("{err}");
        }
    }

    fn save_history(&self) -> ChatResult<()> {
        HistoryDocument::new(&self.turns, self.provider_id(), &self.model).save(&self.paths.history)
    }
}

/// Keeps the most recent [`HISTORY_LIMIT`] turns.
fn truncate_to_limit(turns: &mut Vec<Turn>) {
    if turns.len() > HISTORY_LIMIT {
        let excess = turns.len() - HISTORY_LIMIT;
        turns.drain(..excess);
    }
}

/// Lines in a prompt; zero when empty.
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.matches('\n').count() + 1
    }
}
