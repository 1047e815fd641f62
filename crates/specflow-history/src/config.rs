//! History engine configuration
//!
//! Sources, lowest precedence first: built-in defaults, an optional TOML
//! file, then `SPECFLOW_`-prefixed environment variables
//! (e.g. `SPECFLOW_CHECKPOINT_INTERVAL=5`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::checkpoint::DEFAULT_CHECKPOINT_INTERVAL;
use crate::error::HistoryError;
use crate::events::DEFAULT_EVENT_CAPACITY;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SPECFLOW";

/// Tunables for a [`HistoryManager`](crate::HistoryManager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Commits between checkpoint snapshots
    pub checkpoint_interval: usize,
    /// Whether the manager writes through to its store
    pub persistence_enabled: bool,
    /// History file used by the JSON store
    pub history_path: PathBuf,
    /// Buffered events per subscriber
    pub event_capacity: usize,
    /// Default log filter for the CLI
    pub log_level: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            persistence_enabled: true,
            history_path: default_history_path(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

/// `<config dir>/specflow/history.json`
pub fn default_history_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("specflow")
        .join("history.json")
}

/// `<config dir>/specflow/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("specflow")
        .join("config.toml")
}

impl HistoryConfig {
    /// Load configuration layered over the defaults
    ///
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, HistoryError> {
        let defaults = toml::to_string(&Self::default())
            .map_err(|e| HistoryError::config_error(e.to_string()))?;
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

        let config: HistoryConfig = Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Toml))
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| HistoryError::config_error(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), HistoryError> {
        if self.checkpoint_interval == 0 {
            return Err(HistoryError::config_error(
                "checkpoint_interval must be greater than 0",
            ));
        }
        if self.event_capacity == 0 {
            return Err(HistoryError::config_error(
                "event_capacity must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Use a different checkpoint interval
    pub fn with_checkpoint_interval(mut self, interval: usize) -> Self {
        self.checkpoint_interval = interval;
        self
    }

    /// Use a different history file
    pub fn with_history_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_path = path.into();
        self
    }

    /// Enable or disable write-through persistence
    pub fn with_persistence(mut self, enabled: bool) -> Self {
        self.persistence_enabled = enabled;
        self
    }
}
