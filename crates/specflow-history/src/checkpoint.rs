//! Checkpoint snapshots for fast history reconstruction

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;
use crate::model::AgentCollection;

/// Default number of commits between snapshots
pub const DEFAULT_CHECKPOINT_INTERVAL: usize = 10;

/// A full snapshot of the collection after the patch at `patch_index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Index of the patch this snapshot follows
    pub patch_index: usize,
    /// Collection state after applying patches `0..=patch_index`
    pub snapshot: AgentCollection,
}

impl Checkpoint {
    /// Create a checkpoint
    pub fn new(patch_index: usize, snapshot: AgentCollection) -> Self {
        Checkpoint {
            patch_index,
            snapshot,
        }
    }

    /// Validate the checkpoint against the number of recorded patches
    pub fn validate(&self, patch_count: usize) -> Result<(), HistoryError> {
        if self.patch_index >= patch_count {
            return Err(HistoryError::validation_error(format!(
                "checkpoint at index {} but only {} patches recorded",
                self.patch_index, patch_count
            )));
        }
        Ok(())
    }
}

/// Whether a commit landing at `index` gets a snapshot
///
/// Index 0 never does; the baseline already covers it.
pub fn should_checkpoint(index: usize, interval: usize) -> bool {
    interval > 0 && index > 0 && index % interval == 0
}

/// Drop checkpoints that point past `last_kept`, or all of them when `None`
pub fn purge_after(checkpoints: &mut Vec<Checkpoint>, last_kept: Option<usize>) {
    match last_kept {
        Some(last) => checkpoints.retain(|c| c.patch_index <= last),
        None => checkpoints.clear(),
    }
}

/// The checkpoint with the greatest index not exceeding `target`
pub fn nearest_at_or_before(checkpoints: &[Checkpoint], target: usize) -> Option<&Checkpoint> {
    checkpoints
        .iter()
        .filter(|c| c.patch_index <= target)
        .max_by_key(|c| c.patch_index)
}
