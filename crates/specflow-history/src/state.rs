//! Serializable history state and its pure transitions
//!
//! Every transition consumes the old [`HistoryState`] and returns the next
//! one. The manager swaps the value in, so a half-applied transition is
//! never observable.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::apply::apply_in_place;
use crate::checkpoint::{nearest_at_or_before, purge_after, should_checkpoint, Checkpoint};
use crate::diff::Patch;
use crate::error::HistoryError;
use crate::model::AgentCollection;

/// Patch log, position pointer, baseline and sparse snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    /// Committed patches, oldest first
    #[serde(default)]
    pub patches: Vec<Patch>,
    /// Most recently applied patch; `None` is the pristine baseline
    #[serde(default, with = "position")]
    pub current_index: Option<usize>,
    /// Collection state before any patch
    #[serde(default)]
    pub baseline: AgentCollection,
    /// Snapshots ordered by patch index
    #[serde(default)]
    pub checkpoints: Vec<Checkpoint>,
}

impl HistoryState {
    /// Set the baseline if nothing has been committed yet
    pub fn initialized(mut self, collection: AgentCollection) -> Self {
        if self.patches.is_empty() {
            self.baseline = collection;
        }
        self
    }

    /// Append a patch after the current position
    ///
    /// Patches past the current position are discarded along with their
    /// checkpoints. `applied` must be the patch replayed over the current
    /// collection; it becomes the snapshot when the new index lands on the
    /// interval.
    pub fn committed(mut self, patch: Patch, applied: &AgentCollection, interval: usize) -> Self {
        let keep = self.current_index.map_or(0, |i| i + 1);
        self.patches.truncate(keep);
        purge_after(&mut self.checkpoints, self.current_index);

        self.patches.push(patch);
        let index = self.patches.len() - 1;
        self.current_index = Some(index);

        if should_checkpoint(index, interval) {
            debug!(patch_index = index, "recording checkpoint");
            self.checkpoints.push(Checkpoint::new(index, applied.clone()));
        }
        self
    }

    /// Move the position pointer without touching the log
    pub fn moved_to(mut self, index: Option<usize>) -> Self {
        self.current_index = index;
        self
    }

    /// The pristine state
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Whether there is anything to undo
    pub fn can_undo(&self) -> bool {
        self.current_index.is_some()
    }

    /// Whether there is anything to redo
    pub fn can_redo(&self) -> bool {
        self.next_index() < self.patches.len()
    }

    /// Index a redo would move to
    pub(crate) fn next_index(&self) -> usize {
        self.current_index.map_or(0, |i| i + 1)
    }

    /// Position of the patch with this id
    pub fn position_of(&self, patch_id: &str) -> Option<usize> {
        self.patches.iter().position(|p| p.id() == patch_id)
    }

    /// Patches currently applied, oldest first
    pub fn applied_patches(&self) -> &[Patch] {
        &self.patches[..self.next_index().min(self.patches.len())]
    }

    /// Reconstruct the collection after the patch at `target`
    ///
    /// Starts from the nearest snapshot at or before `target`, or the
    /// baseline, and replays the remaining patches.
    pub fn rebuild(&self, target: Option<usize>) -> AgentCollection {
        let Some(target) = target else {
            return self.baseline.clone();
        };

        let (mut collection, start) = match nearest_at_or_before(&self.checkpoints, target) {
            Some(checkpoint) => (checkpoint.snapshot.clone(), checkpoint.patch_index + 1),
            None => (self.baseline.clone(), 0),
        };

        let replay = self.patches.iter().take(target + 1).skip(start);
        let mut replayed = 0usize;
        for patch in replay {
            apply_in_place(&mut collection, patch);
            replayed += 1;
        }
        debug!(target, start, replayed, "rebuilt collection");
        collection
    }

    /// The collection at the current position
    pub fn current_collection(&self) -> AgentCollection {
        self.rebuild(self.current_index)
    }

    /// Check a state loaded from storage
    ///
    /// An out-of-range position is an error. Checkpoints that are out of
    /// range or out of order are dropped with a warning.
    pub fn validated(mut self) -> Result<Self, HistoryError> {
        if let Some(index) = self.current_index {
            if index >= self.patches.len() {
                return Err(HistoryError::validation_error(format!(
                    "current index {} out of range for {} patches",
                    index,
                    self.patches.len()
                )));
            }
        }

        let patch_count = self.patches.len();
        let before = self.checkpoints.len();
        let mut last: Option<usize> = None;
        self.checkpoints.retain(|checkpoint| {
            let in_order = last.map_or(true, |l| checkpoint.patch_index > l);
            let keep = in_order && checkpoint.validate(patch_count).is_ok();
            if keep {
                last = Some(checkpoint.patch_index);
            }
            keep
        });

        let dropped = before - self.checkpoints.len();
        if dropped > 0 {
            warn!(dropped, "dropped invalid checkpoints from stored history");
        }
        Ok(self)
    }
}

/// `Option<usize>` on the wire as `-1` or the index
mod position {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_u64(*index as u64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        match raw {
            -1 => Ok(None),
            n if n >= 0 => usize::try_from(n).map(Some).map_err(de::Error::custom),
            n => Err(de::Error::custom(format!("invalid current index {}", n))),
        }
    }
}
