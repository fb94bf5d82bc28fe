//! Provider registry: the catalog plus each provider's credential state.
//!
//! Built once at startup from [`ProviderKind::ALL`]. A provider is enabled
//! exactly when its credential is non-empty; keys are re-read on set/remove.

use tracing::{info, warn};

use super::kind::{ProviderKind, ProviderSpec};
use crate::config::ProviderConfig;
use crate::credentials::CredentialStore;
use crate::error::{ChatError, ChatResult};

/// A catalog entry with its mutable credential overlay.
#[derive(Debug, Clone)]
pub struct Provider {
    pub kind: ProviderKind,
    /// Endpoint URL (catalog default unless overridden in config).
    pub base_url: String,
    api_key: String,
}

impl Provider {
    pub fn spec(&self) -> &'static ProviderSpec {
        self.kind.spec()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// All known providers in registry order.
#[derive(Debug)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    store: CredentialStore,
}

impl ProviderRegistry {
    /// Builds the registry and loads every provider's credential.
    ///
    /// Emits one enable/disable event per provider. A key file that cannot
    /// be read leaves its provider disabled.
    pub fn load(store: CredentialStore, overrides: &ProviderConfig) -> Self {
        let mut providers = Vec::with_capacity(ProviderKind::ALL.len());
        for kind in ProviderKind::ALL {
            let spec = kind.spec();
            let api_key = store.load(spec.key_file).unwrap_or_else(|err| {
                warn!(provider = kind.id(), "{err}");
                String::new()
            });
            if api_key.is_empty() {
                info!(provider = kind.id(), key_file = spec.key_file, "no API key found");
            } else {
                info!(provider = kind.id(), key_file = spec.key_file, "API key loaded");
            }
            let base_url = overrides
                .base_url(kind)
                .unwrap_or(spec.base_url)
                .to_string();
            providers.push(Provider {
                kind,
                base_url,
                api_key,
            });
        }
        let registry = Self { providers, store };
        info!(
            enabled = registry.enabled_count(),
            total = registry.len(),
            "providers loaded"
        );
        registry
    }

    pub fn get(&self, kind: ProviderKind) -> &Provider {
        // `providers` holds every kind, in declaration order.
        &self.providers[kind as usize]
    }

    fn get_mut(&mut self, kind: ProviderKind) -> &mut Provider {
        &mut self.providers[kind as usize]
    }

    /// Providers in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.iter()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Identifiers of every enabled provider, in registry order.
    pub fn list_enabled(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|p| p.is_enabled())
            .map(|p| p.kind)
            .collect()
    }

    pub fn enabled_count(&self) -> usize {
        self.providers.iter().filter(|p| p.is_enabled()).count()
    }

    pub fn is_enabled(&self, kind: ProviderKind) -> bool {
        self.get(kind).is_enabled()
    }

    /// Model identifiers of a provider, in catalog order.
    pub fn models_of(&self, kind: ProviderKind) -> &'static [&'static str] {
        kind.spec().models
    }

    /// Persists a credential and enables the provider.
    pub fn set_key(&mut self, kind: ProviderKind, secret: &str) -> ChatResult<()> {
        if secret.is_empty() {
            return Err(ChatError::EmptyCredential);
        }
        self.store.save(kind.spec().key_file, secret)?;
        self.get_mut(kind).api_key = secret.to_string();
        info!(provider = kind.id(), "API key saved");
        Ok(())
    }

    /// Deletes a credential and disables the provider.
    pub fn remove_key(&mut self, kind: ProviderKind) -> ChatResult<()> {
        self.store.remove(kind.spec().key_file)?;
        self.get_mut(kind).api_key.clear();
        info!(provider = kind.id(), "API key removed");
        Ok(())
    }

    /// First enabled provider in registry order other than `excluded`.
    pub fn first_enabled_except(&self, excluded: Option<ProviderKind>) -> Option<ProviderKind> {
        self.providers
            .iter()
            .find(|p| p.is_enabled() && Some(p.kind) != excluded)
            .map(|p| p.kind)
    }

    /// Full path of a provider's credential file.
    pub fn key_path(&self, kind: ProviderKind) -> std::path::PathBuf {
        self.store.path(kind.spec().key_file)
    }
}
