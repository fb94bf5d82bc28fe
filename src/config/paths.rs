//! XDG path resolution for yuzu configuration and data directories.

use anyhow::Result;
use std::path::PathBuf;

use super::types::Config;
use crate::constants::{HISTORY_FILENAME, PROFILE_FILENAME, SYSTEM_PROMPT_FILENAME};

/// Locations of the files a chat session persists.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    /// Directory holding credential files.
    pub data_dir: PathBuf,
    pub profile: PathBuf,
    pub history: PathBuf,
    pub system_prompt: PathBuf,
}

impl SessionPaths {
    /// Lays out the session files inside `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let data_dir = dir.into();
        Self {
            profile: data_dir.join(PROFILE_FILENAME),
            history: data_dir.join(HISTORY_FILENAME),
            system_prompt: data_dir.join(SYSTEM_PROMPT_FILENAME),
            data_dir,
        }
    }
}

impl Config {
    /// Returns the platform-specific configuration directory for yuzu.
    ///
    /// Returns `~/.config/yuzu/` on Linux (`XDG_CONFIG_HOME/yuzu`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's config directory cannot be determined.
    pub fn config_dir() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the directory holding credentials and session files.
    ///
    /// Uses `data_dir` from the config when set, otherwise
    /// `~/.local/share/yuzu/` on Linux (`XDG_DATA_HOME/yuzu`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform's data directory cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the platform-specific cache directory for yuzu.
    ///
    /// Used for storing readline history.
    pub fn cache_dir() -> Result<PathBuf> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join(crate::constants::APP_NAME);
        Ok(dir)
    }

    /// Returns the full path to the yuzu configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(crate::constants::CONFIG_FILENAME))
    }

    /// Session file layout under [`Config::data_dir`].
    pub fn session_paths(&self) -> Result<SessionPaths> {
        Ok(SessionPaths::in_dir(self.data_dir()?))
    }
}
