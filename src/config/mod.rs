//! Configuration management for mosaicsh
//!
//! Settings are read from a TOML or JSON file (see [`loader`]). Every
//! section and field has a default, so a partial file, or none at all, is
//! a valid configuration.

pub mod loader;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::history::{HistoryManager, DEFAULT_MAX_ENTRIES};

pub use loader::{ConfigFormat, ConfigLoader};
pub use prompt::PromptFormatter;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interactive shell settings
    pub shell: ShellConfig,

    /// Command history settings
    pub history: HistoryConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// Interactive shell settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt template, see [`PromptFormatter`]
    pub prompt: String,

    /// Startup file run before the first prompt; `~/.mosaicshrc` when unset
    pub rc_file: Option<PathBuf>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "$USER@$HOSTNAME:$PWD$ ".to_string(),
            rc_file: None,
        }
    }
}

impl ShellConfig {
    /// The startup file to run, if any
    pub fn rc_path(&self) -> Option<PathBuf> {
        self.rc_file
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join(".mosaicshrc")))
    }
}

/// Command history settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether history is persisted at all
    pub enabled: bool,

    /// History file; `~/.mosaicsh_history` when unset
    pub file: Option<PathBuf>,

    /// Maximum number of entries kept
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl HistoryConfig {
    /// Build the history manager these settings describe
    pub fn manager(&self) -> HistoryManager {
        let file = if self.enabled {
            self.file.clone().or_else(HistoryManager::default_history_path)
        } else {
            None
        };
        HistoryManager::new(file, self.max_entries)
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `MOSAICSH_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Check values serde cannot rule out
    pub fn validate(&self) -> Result<()> {
        if self.history.max_entries == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "history.max_entries".to_string(),
                reason: "History size must be greater than 0".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "logging.level".to_string(),
                reason: "Log level cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
