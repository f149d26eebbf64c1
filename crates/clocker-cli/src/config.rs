//! Configuration loading and management.

use std::path::{Path, PathBuf};

use clocker_core::FormatOptions;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
///
/// Every field can come from the config file or a `CLOCKER_*` variable,
/// e.g. `CLOCKER_SUPPRESS_DELTA=true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default rendering of timestamp lines.
    #[serde(flatten)]
    pub format: FormatOptions,
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("CLOCKER_"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for clocker.
///
/// On Linux: `~/.config/clocker`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("clocker"))
}
