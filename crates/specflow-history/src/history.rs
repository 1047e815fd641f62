//! History management and navigation
//!
//! [`HistoryManager`] owns one editing session's [`HistoryState`]. Each
//! mutating call computes the next state, swaps it in, notifies
//! subscribers and then writes through to the store. A failed write is
//! reported in the returned [`Transition`] and never undoes the in-memory
//! change.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::apply::apply_patch;
use crate::config::HistoryConfig;
use crate::diff::{generate_patch, Impact, Patch, PatchOptions};
use crate::error::HistoryError;
use crate::events::{EventBus, HistoryEvent};
use crate::impact::classify;
use crate::model::AgentCollection;
use crate::persistence::{HistoryStore, JsonFileStore};
use crate::state::HistoryState;

/// The value of a completed transition plus any write-through failure
#[derive(Debug)]
#[must_use]
pub struct Transition<T> {
    /// What the operation produced
    pub value: T,
    /// Set when the new state could not be persisted
    pub persistence_error: Option<HistoryError>,
}

impl<T> Transition<T> {
    fn new(value: T, persistence_error: Option<HistoryError>) -> Self {
        Self {
            value,
            persistence_error,
        }
    }

    /// Whether the new state reached the store
    pub fn is_persisted(&self) -> bool {
        self.persistence_error.is_none()
    }

    /// Drop the persistence outcome
    pub fn into_value(self) -> T {
        self.value
    }

    /// Split into value and persistence outcome
    pub fn into_parts(self) -> (T, Option<HistoryError>) {
        (self.value, self.persistence_error)
    }
}

/// Result of [`HistoryManager::commit`]
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// A patch was appended and is now current
    Committed(Patch),
    /// Before and after were identical; nothing changed
    NothingToCommit,
}

impl CommitOutcome {
    /// The committed patch, if any
    pub fn patch(&self) -> Option<&Patch> {
        match self {
            CommitOutcome::Committed(patch) => Some(patch),
            CommitOutcome::NothingToCommit => None,
        }
    }
}

/// One row of the history listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchEntry {
    /// Position in the log
    pub index: usize,
    /// Patch id
    pub id: String,
    /// Patch name
    pub name: String,
    /// Patch summary
    pub summary: String,
    /// Classified severity
    pub impact: Impact,
    /// Whether the patch is at or before the current position
    pub applied: bool,
}

/// Checkpointed undo/redo history over an agent collection
pub struct HistoryManager {
    config: HistoryConfig,
    state: HistoryState,
    current: AgentCollection,
    store: Option<Box<dyn HistoryStore>>,
    events: EventBus,
}

impl HistoryManager {
    /// Create an in-memory manager with no store
    pub fn new(config: HistoryConfig) -> Self {
        let events = EventBus::with_capacity(config.event_capacity);
        Self {
            config,
            state: HistoryState::default(),
            current: AgentCollection::new(),
            store: None,
            events,
        }
    }

    /// Create a manager backed by the JSON file at `config.history_path`
    ///
    /// Falls back to an in-memory manager when persistence is disabled.
    pub fn open(config: HistoryConfig) -> Result<Self, HistoryError> {
        if !config.persistence_enabled {
            config.validate()?;
            return Ok(Self::new(config));
        }
        let store = JsonFileStore::new(config.history_path.clone());
        Self::with_store(config, Box::new(store))
    }

    /// Create a manager backed by `store`, resuming any stored history
    pub fn with_store(
        config: HistoryConfig,
        store: Box<dyn HistoryStore>,
    ) -> Result<Self, HistoryError> {
        config.validate()?;

        let state = match store.load()? {
            Some(state) => state.validated()?,
            None => HistoryState::default(),
        };
        let current = state.current_collection();
        debug!(
            patches = state.patches.len(),
            current_index = ?state.current_index,
            "opened history"
        );

        let mut manager = Self::new(config);
        manager.state = state;
        manager.current = current;
        manager.store = Some(store);
        Ok(manager)
    }

    /// Set the baseline collection
    ///
    /// Ignored once any patch has been committed.
    pub fn initialize(&mut self, collection: AgentCollection) -> Transition<()> {
        if !self.state.patches.is_empty() {
            debug!("history already has patches, keeping baseline");
            return Transition::new((), None);
        }

        let state = std::mem::take(&mut self.state);
        self.state = state.initialized(collection);
        self.current = self.state.baseline.clone();
        info!(agents = self.current.len(), "initialized history baseline");

        self.events.publish(HistoryEvent::Initialized);
        Transition::new((), self.persist())
    }

    /// Record the change from `before` to `after`
    ///
    /// The patch is replayed over the current collection, so the new
    /// current state is what a later rebuild produces, even when `before`
    /// is not the current state or `after` orders agents differently.
    pub fn commit(
        &mut self,
        before: &AgentCollection,
        after: &AgentCollection,
        name: Option<&str>,
    ) -> Transition<CommitOutcome> {
        let options = PatchOptions {
            name: name.map(str::to_string),
            ..Default::default()
        };
        self.commit_with(before, after, options)
    }

    /// Record the change from `before` to `after` with full patch options
    pub fn commit_with(
        &mut self,
        before: &AgentCollection,
        after: &AgentCollection,
        options: PatchOptions,
    ) -> Transition<CommitOutcome> {
        let patch = generate_patch(before, after, options);
        if patch.is_empty() {
            debug!("no differences, nothing to commit");
            return Transition::new(CommitOutcome::NothingToCommit, None);
        }

        let impact = classify(&patch);
        let discarded = self.state.patches.len() - self.state.next_index();
        let applied = apply_patch(&self.current, &patch);
        let state = std::mem::take(&mut self.state);
        self.state = state.committed(patch.clone(), &applied, self.config.checkpoint_interval);
        self.current = applied;

        let index = self.state.patches.len() - 1;
        info!(
            patch_id = %patch.id(),
            name = %patch.name(),
            %impact,
            index,
            discarded,
            "committed patch"
        );

        self.events.publish(HistoryEvent::Committed {
            patch: patch.clone(),
            impact,
            index,
        });
        Transition::new(CommitOutcome::Committed(patch), self.persist())
    }

    /// Step back one patch
    pub fn undo(&mut self) -> Result<Transition<AgentCollection>, HistoryError> {
        let Some(index) = self.state.current_index else {
            return Err(HistoryError::undo_boundary());
        };
        let target = index.checked_sub(1);
        self.move_to(target);
        info!(index = ?target, "undo");

        self.events.publish(HistoryEvent::Undone { index: target });
        Ok(Transition::new(self.current.clone(), self.persist()))
    }

    /// Step forward one patch
    pub fn redo(&mut self) -> Result<Transition<AgentCollection>, HistoryError> {
        if !self.state.can_redo() {
            return Err(HistoryError::redo_boundary());
        }
        let target = self.state.next_index();
        self.move_to(Some(target));
        info!(index = target, "redo");

        self.events.publish(HistoryEvent::Redone { index: target });
        Ok(Transition::new(self.current.clone(), self.persist()))
    }

    /// Jump to the state right after the patch with this id
    ///
    /// Later patches stay in the log and can be redone until the next commit.
    pub fn revert_to(&mut self, patch_id: &str) -> Result<Transition<AgentCollection>, HistoryError> {
        let index = self
            .state
            .position_of(patch_id)
            .ok_or_else(|| HistoryError::not_found(patch_id))?;
        self.move_to(Some(index));
        info!(patch_id, index, "reverted to patch");

        self.events.publish(HistoryEvent::Reverted {
            patch_id: patch_id.to_string(),
            index,
        });
        Ok(Transition::new(self.current.clone(), self.persist()))
    }

    /// Drop all history and the baseline
    pub fn clear(&mut self) -> Transition<()> {
        self.state = HistoryState::cleared();
        self.current = AgentCollection::new();
        info!("cleared history");

        self.events.publish(HistoryEvent::Cleared);
        let error = match (&self.store, self.config.persistence_enabled) {
            (Some(store), true) => store.clear().err(),
            _ => None,
        };
        if let Some(err) = &error {
            warn!(error = %err, "failed to clear stored history");
        }
        Transition::new((), error)
    }

    /// The collection at the current position
    pub fn current_state(&self) -> &AgentCollection {
        &self.current
    }

    /// The full history state
    pub fn state(&self) -> &HistoryState {
        &self.state
    }

    /// Configuration in use
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Whether [`undo`](Self::undo) would succeed
    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    /// Whether [`redo`](Self::redo) would succeed
    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// All recorded patches, oldest first
    pub fn patches(&self) -> &[Patch] {
        &self.state.patches
    }

    /// Position of the most recently applied patch
    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index
    }

    /// Listing of every patch with its classification
    pub fn entries(&self) -> Vec<PatchEntry> {
        let next = self.state.next_index();
        self.state
            .patches
            .iter()
            .enumerate()
            .map(|(index, patch)| PatchEntry {
                index,
                id: patch.id().to_string(),
                name: patch.name().to_string(),
                summary: patch.summary().to_string(),
                impact: classify(patch),
                applied: index < next,
            })
            .collect()
    }

    /// Receive history events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<HistoryEvent> {
        self.events.subscribe()
    }

    /// The event bus, for sharing with other components
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn move_to(&mut self, index: Option<usize>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.moved_to(index);
        self.current = self.state.rebuild(index);
    }

    fn persist(&self) -> Option<HistoryError> {
        if !self.config.persistence_enabled {
            return None;
        }
        let store = self.store.as_ref()?;
        match store.save(&self.state) {
            Ok(()) => None,
            Err(err) => {
                warn!(error = %err, "failed to persist history, keeping in-memory state");
                Some(err)
            }
        }
    }
}

impl std::fmt::Debug for HistoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("config", &self.config)
            .field("patches", &self.state.patches.len())
            .field("current_index", &self.state.current_index)
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}
