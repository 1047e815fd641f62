//! Log of patches received from a companion system
//!
//! Separate from the local undo history: entries arrive from outside and
//! are marked applied once the editor has replayed them.

use chrono::Utc;

use crate::diff::Patch;
use crate::error::HistoryError;

/// Received patches in arrival order
#[derive(Debug, Clone, Default)]
pub struct SyncPatchLog {
    patches: Vec<Patch>,
}

impl SyncPatchLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a received patch
    pub fn add(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Stamp `appliedAt` on the patch with this id
    pub fn mark_applied(&mut self, patch_id: &str) -> Result<&Patch, HistoryError> {
        let patch = self
            .patches
            .iter_mut()
            .find(|p| p.id() == patch_id)
            .ok_or_else(|| HistoryError::not_found(patch_id))?;
        patch.spec.applied_at = Some(Utc::now());
        Ok(patch)
    }

    /// Drop the patch with this id, returning it
    pub fn remove(&mut self, patch_id: &str) -> Option<Patch> {
        let pos = self.patches.iter().position(|p| p.id() == patch_id)?;
        Some(self.patches.remove(pos))
    }

    /// Drop every patch
    pub fn clear(&mut self) {
        self.patches.clear();
    }

    /// Patches that have been marked applied
    pub fn applied(&self) -> Vec<&Patch> {
        self.patches
            .iter()
            .filter(|p| p.spec.applied_at.is_some())
            .collect()
    }

    /// All patches in arrival order
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Number of patches
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}
