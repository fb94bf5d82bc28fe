//! Configuration types and path resolution for yuzu.
//!
//! Yuzu stores its settings as TOML at the platform's XDG config path
//! (e.g. `~/.config/yuzu/config.toml` on Linux) and credentials plus session
//! data under the XDG data directory (`~/.local/share/yuzu/`).

mod loader;
mod paths;
mod types;

pub use paths::SessionPaths;
pub use types::{Config, ProviderConfig};
#[cfg(test)]
pub use types::ProviderEntry;

use anyhow::Result;

impl Config {
    /// Load the global config, or defaults when none exists.
    pub fn load() -> Result<Self> {
        Self::load_global()
    }
}
