//! Configuration management for meterlog.
//!
//! Handles:
//! - Database location
//! - Invoice defaults
//! - Chart rendering options

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{MeterError, Result};
use crate::invoice::chart;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Invoice defaults.
    #[serde(default)]
    pub invoice: InvoiceConfig,
    /// Chart rendering settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MeterError::io(format!("failed to read config file {}", path.display()), e)
        })?;

        toml::from_str(&content).map_err(|e| MeterError::InvalidConfig {
            message: e.to_string(),
        })
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MeterError::io(format!("failed to create config directory {}", parent.display()), e)
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| MeterError::InvalidConfig {
            message: format!("failed to serialize config: {e}"),
        })?;

        std::fs::write(path, content).map_err(|e| {
            MeterError::io(format!("failed to write config file {}", path.display()), e)
        })
    }

    /// The database path to use: explicit override, configured path, or the
    /// platform data directory.
    #[must_use]
    pub fn database_path(&self, override_path: Option<&Path>) -> PathBuf {
        if let Some(path) = override_path {
            return path.to_path_buf();
        }
        if let Some(path) = &self.database.path {
            return path.clone();
        }
        default_data_dir().join("meterlog.db")
    }
}

/// Database settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file location; platform data directory when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Invoice defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceConfig {
    /// Normalize distributions by default.
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self { normalize: true }
    }
}

/// Chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Bar field width in characters.
    #[serde(default = "default_chart_width")]
    pub width: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_chart_width() -> usize {
    chart::DEFAULT_WIDTH
}

/// Default configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "meterlog").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Default data directory; falls back to the working directory when the
/// platform offers none.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "meterlog")
        .map_or_else(|| PathBuf::from("."), |dirs| dirs.data_dir().to_path_buf())
}
