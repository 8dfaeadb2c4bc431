//! Configuration management for teamtrack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default application directory name.
const APP_DIR_NAME: &str = "teamtrack";

/// Directory under the application directory holding team documents.
const DATA_DIR_NAME: &str = "data";

/// Directory under the application directory holding history logs.
const HISTORY_DIR_NAME: &str = "history";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `TEAMTRACK_`)
/// 2. TOML config file at `~/.config/teamtrack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Roster configuration.
    pub roster: RosterConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Default session configuration.
    pub session: SessionConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one team document per tech lead.
    /// Defaults to `~/.local/share/teamtrack/data`
    pub data_dir: Option<PathBuf>,
    /// Directory holding history logs.
    /// Defaults to `~/.local/share/teamtrack/history`
    pub history_dir: Option<PathBuf>,
    /// Record every change in the history log.
    pub history_enabled: bool,
}

/// Roster-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Intern sheet (CSV with a `Name` column).
    pub path: Option<PathBuf>,
}

/// Export-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to. Defaults to the working directory.
    pub output_dir: Option<PathBuf>,
    /// Append a timestamp to generated export file names.
    pub timestamped_names: bool,
}

/// Defaults for the caller's session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tech lead used when `--tech-lead` is not given.
    pub tech_lead: Option<String>,
    /// Run as administrator.
    pub admin: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            history_dir: None,
            history_enabled: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            timestamped_names: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("TEAMTRACK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate one specific configuration file.
    ///
    /// Unlike [`Config::load_from`], a missing file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValidation`] if the file does not exist, or any
    /// error [`Config::load_from`] returns.
    pub fn validate_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigValidation {
                message: format!("{} does not exist", path.display()),
            });
        }
        Self::load_from(Some(path.to_path_buf()))
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default application data directory.
    #[must_use]
    pub fn default_app_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(APP_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Some(tech_lead) = &self.session.tech_lead {
            if tech_lead.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "session.tech_lead cannot be blank".to_string(),
                });
            }
        }

        if self.data_dir() == self.history_dir() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "storage.data_dir and storage.history_dir must differ (both are {})",
                    self.data_dir().display()
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(|| Self::default_app_dir().join(DATA_DIR_NAME))
    }

    /// Get the history directory, resolving defaults if not set.
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.storage
            .history_dir
            .clone()
            .unwrap_or_else(|| Self::default_app_dir().join(HISTORY_DIR_NAME))
    }

    /// Get the export directory, defaulting to the working directory.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
