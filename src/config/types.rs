//! Struct definitions and serde defaults for yuzu configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::provider::ProviderKind;

/// Root configuration for yuzu, deserialized from `config.toml`.
///
/// Fields use serde defaults so yuzu can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding credentials, profile, history and system prompt.
    /// Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Whether the REPL starts in streaming mode.
    #[serde(default)]
    pub stream: bool,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Returns the default request timeout.
///
/// Used by serde's `#[serde(default)]` attribute during deserialization.
pub(super) fn default_timeout_secs() -> u64 {
    crate::constants::REQUEST_TIMEOUT_SECS
}

/// Provider-specific configuration map.
///
/// Each field corresponds to a catalog provider. Only providers
/// the user has configured will be `Some`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chutes: Option<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openrouter: Option<ProviderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cerebras: Option<ProviderEntry>,
}

/// Connection overrides for a single provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// Custom chat-completions URL (useful for proxies or self-hosted gateways).
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Endpoint override for a provider, if configured.
    pub fn base_url(&self, kind: ProviderKind) -> Option<&str> {
        let entry = match kind {
            ProviderKind::Chutes => &self.chutes,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::Cerebras => &self.cerebras,
        };
        entry
            .as_ref()
            .and_then(|e| e.base_url.as_deref())
            .filter(|url| !url.trim().is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            stream: false,
            timeout_secs: default_timeout_secs(),
            provider: ProviderConfig::default(),
        }
    }
}
