// Command handlers for the specflow CLI

pub mod analyze;
pub mod clear;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod navigate;
pub mod show;

pub use analyze::AnalyzeCommand;
pub use clear::ClearCommand;
pub use commit::CommitCommand;
pub use diff::DiffCommand;
pub use init::InitCommand;
pub use log::LogCommand;
pub use navigate::{NavigateCommand, Navigation};
pub use show::ShowCommand;

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use specflow_common::ContentCache;
use specflow_history::{AgentCollection, HistoryConfig, HistoryError, HistoryManager};
use tracing::debug;

use crate::error::{CliError, CliResult};
use crate::output::print_warning;

/// Trait for command handlers
pub trait Command {
    /// Execute the command
    fn execute(&self, ctx: &Context) -> CliResult<()>;
}

/// Shared state for one CLI invocation
pub struct Context {
    config: HistoryConfig,
    cache: RefCell<ContentCache<AgentCollection>>,
}

impl Context {
    /// Build a context from a loaded configuration
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            cache: RefCell::new(ContentCache::new()),
        }
    }

    /// Load configuration, then apply a history path override
    pub fn load(config_path: Option<&Path>, history: Option<PathBuf>) -> CliResult<Self> {
        let mut config = HistoryConfig::load(config_path)?;
        if let Some(path) = history {
            config.history_path = path;
        }
        Ok(Self::new(config))
    }

    /// Configuration in use
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Open the history for this invocation
    pub fn open_history(&self) -> CliResult<HistoryManager> {
        debug!(path = %self.config.history_path.display(), "opening history");
        Ok(HistoryManager::open(self.config.clone())?)
    }

    /// Read a JSON array of agents
    ///
    /// Identical file contents are parsed once per invocation.
    pub fn read_collection(&self, path: &Path) -> CliResult<AgentCollection> {
        let content = std::fs::read_to_string(path)?;
        let mut cache = self.cache.borrow_mut();
        let collection = cache.get_or_try_insert_with(&content, |text| {
            serde_json::from_str::<AgentCollection>(text).map_err(|e| CliError::InvalidCollection {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(collection.clone())
    }
}

/// Print a warning when a transition could not be persisted
pub(crate) fn report_persistence(error: Option<HistoryError>) {
    if let Some(err) = error {
        print_warning(&format!("History change not saved: {}", err));
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::PathBuf;

    use specflow_history::{Agent, AgentCollection, HistoryConfig};
    use tempfile::TempDir;

    use super::Context;

    /// A context writing history into a temp dir
    pub fn context(dir: &TempDir) -> Context {
        let config = HistoryConfig::default()
            .with_history_path(dir.path().join("history.json"))
            .with_checkpoint_interval(3);
        Context::new(config)
    }

    /// Write a collection as JSON and return its path
    pub fn write_collection(dir: &TempDir, name: &str, agents: Vec<Agent>) -> PathBuf {
        let path = dir.path().join(name);
        let json = serde_json::to_string_pretty(&AgentCollection::from(agents)).unwrap();
        std::fs::write(&path, json).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use specflow_history::Agent;
    use tempfile::TempDir;

    #[test]
    fn test_read_collection() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let path = write_collection(&dir, "a.json", vec![Agent::new("a")]);

        let collection = ctx.read_collection(&path).unwrap();
        assert_eq!(collection.len(), 1);

        // Same content again is served from the cache
        let again = ctx.read_collection(&path).unwrap();
        assert_eq!(again, collection);
        assert_eq!(ctx.cache.borrow().stats().hits, 1);
    }

    #[test]
    fn test_read_collection_rejects_non_array() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"name":"a"}"#).unwrap();

        let err = ctx.read_collection(&path).unwrap_err();
        assert!(matches!(err, CliError::InvalidCollection { .. }));
    }

    #[test]
    fn test_read_collection_missing_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let err = ctx.read_collection(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
