//! File loading for yuzu configuration.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::Config;

impl Config {
    /// Loads the global config from `~/.config/yuzu/config.toml`.
    ///
    /// A missing file yields the defaults; nothing is written.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads a config file, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config at {:?}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert!(!config.stream);
        assert_eq!(config.timeout_secs, crate::constants::REQUEST_TIMEOUT_SECS);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"data_dir = "/tmp/yuzu-data"
stream = true
timeout_secs = 5

[provider.openrouter]
base_url = "http://localhost:9999/v1/chat/completions"
"#,
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(config.stream);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.data_dir().unwrap(), Path::new("/tmp/yuzu-data"));
        assert_eq!(
            config.provider.base_url(ProviderKind::OpenRouter),
            Some("http://localhost:9999/v1/chat/completions")
        );
        assert_eq!(config.provider.base_url(ProviderKind::Chutes), None);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "stream = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
