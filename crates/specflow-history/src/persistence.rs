//! Durable storage for history state

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use specflow_common::{load_json_if_exists, remove_json, save_json_atomic};
use tracing::debug;

use crate::error::HistoryError;
use crate::state::HistoryState;

/// Where a [`HistoryState`] is kept between sessions
///
/// Called synchronously after every mutating history operation.
pub trait HistoryStore: Send {
    /// Read the stored state, `None` if nothing was stored yet
    fn load(&self) -> Result<Option<HistoryState>, HistoryError>;

    /// Replace the stored state
    fn save(&self, state: &HistoryState) -> Result<(), HistoryError>;

    /// Remove the stored state
    fn clear(&self) -> Result<(), HistoryError>;
}

impl<S: HistoryStore + Sync> HistoryStore for Arc<S> {
    fn load(&self) -> Result<Option<HistoryState>, HistoryError> {
        (**self).load()
    }

    fn save(&self, state: &HistoryState) -> Result<(), HistoryError> {
        (**self).save(state)
    }

    fn clear(&self) -> Result<(), HistoryError> {
        (**self).clear()
    }
}

/// Stores history as a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Option<HistoryState>, HistoryError> {
        let state: Option<HistoryState> = load_json_if_exists(&self.path)?;
        if let Some(state) = &state {
            debug!(path = %self.path.display(), patches = state.patches.len(), "loaded history");
        }
        Ok(state)
    }

    fn save(&self, state: &HistoryState) -> Result<(), HistoryError> {
        save_json_atomic(&self.path, state)?;
        debug!(path = %self.path.display(), patches = state.patches.len(), "saved history");
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        let removed = remove_json(&self.path)?;
        debug!(path = %self.path.display(), removed, "cleared stored history");
        Ok(())
    }
}

/// Keeps the serialized state in memory
///
/// Goes through serde like the file store, so tests see the same
/// round-trip behavior.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw JSON last saved
    pub fn raw(&self) -> Option<String> {
        self.data.lock().clone()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Option<HistoryState>, HistoryError> {
        match self.data.lock().as_deref() {
            Some(json) => Ok(Some(serde_json::from_str(json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &HistoryState) -> Result<(), HistoryError> {
        let json = serde_json::to_string(state)?;
        *self.data.lock() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), HistoryError> {
        *self.data.lock() = None;
        Ok(())
    }
}
