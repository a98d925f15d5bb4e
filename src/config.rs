//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory
//! 3. `DUPEDETECT_*` environment variables
//!
//! Command-line flags are applied on top by the caller.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::TiePolicy;
use crate::output::DEFAULT_EXPORT_FILE;
use crate::scanner::DEFAULT_PROGRESS_INTERVAL;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPEDETECT_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the export action writes the duplicate list.
    pub output_file: PathBuf,
    /// Hashing progress is reported every this many files.
    pub progress_interval: usize,
    /// Follow symbolic links while scanning.
    pub follow_symlinks: bool,
    /// How copies created at the same instant as their keeper are treated.
    pub tie_policy: TiePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            follow_symlinks: false,
            tie_policy: TiePolicy::Literal,
        }
    }
}

impl Config {
    /// Load the configuration from the default locations.
    ///
    /// A broken config file or environment variable is logged and the
    /// defaults are used instead.
    pub fn load() -> Self {
        let path = Self::config_path().ok();
        match Self::load_from(path.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load defaults, then `path` (if it exists), then the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment holds invalid values.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(path).extract()?)
    }

    /// The figment used by [`Config::load_from`].
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            if path.exists() {
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Save the configuration as TOML to the default platform path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save the configuration as TOML to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Get the default platform-specific configuration path.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn config_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupedetect", "dupedetect")
            .ok_or_else(|| anyhow::anyhow!("Failed to determine project directories"))?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }
}
