#![warn(missing_docs)]

//! Diff/patch engine and checkpointed undo/redo history for agent collections
//!
//! - [`generate_patch`] computes the ordered diffs between two collections
//! - [`apply_patch`] and [`revert_patch`] replay them forwards and backwards
//! - [`classify`] assigns a severity to a patch
//! - [`HistoryManager`] keeps the patch log, navigates it, snapshots every
//!   few commits and writes through to a [`HistoryStore`]

pub mod analysis;
pub mod apply;
pub mod checkpoint;
pub mod config;
pub mod diff;
pub mod error;
pub mod events;
pub mod history;
pub mod impact;
pub mod model;
pub mod persistence;
pub mod state;
pub mod sync;

pub use analysis::{
    communication_graph, extract_all_capabilities, extract_all_constraints, isolated_agents,
    CommunicationEdge,
};
pub use apply::{apply_patch, is_patch_empty, revert_patch};
pub use checkpoint::{Checkpoint, DEFAULT_CHECKPOINT_INTERVAL};
pub use config::HistoryConfig;
pub use diff::{
    generate_diffs, generate_patch, summarize, Author, Diff, DiffValue, FieldPath, Impact,
    Operation, Patch, PatchOptions,
};
pub use error::{Direction, HistoryError, HistoryResult};
pub use events::{EventBus, HistoryEvent};
pub use history::{CommitOutcome, HistoryManager, PatchEntry, Transition};
pub use impact::{classify, classify_diffs, describe_operations};
pub use model::{validate_collection, Agent, AgentCollection, Communication};
pub use persistence::{HistoryStore, JsonFileStore, MemoryStore};
pub use state::HistoryState;
pub use sync::SyncPatchLog;
