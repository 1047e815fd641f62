//! Patch application and reversal
//!
//! Both entry points are pure: they return a new collection and leave the
//! input untouched. A diff that names an agent missing from the collection
//! is skipped.
//!
//! A set remove drops the first equal element. The generator emits one
//! remove per occurrence, so a value listed twice is fully cleared by its
//! patch.
//!
//! Apply policy for inputs the generator never produces:
//! - adding an agent whose name is already present is skipped
//! - adding a set value that is already present is skipped
//! - a diff whose operation does not fit its path is skipped

use tracing::{trace, warn};

use crate::diff::{Diff, DiffValue, FieldPath, Operation, Patch};
use crate::model::AgentCollection;

/// Replay a patch over a collection
pub fn apply_patch(collection: &AgentCollection, patch: &Patch) -> AgentCollection {
    let mut result = collection.clone();
    apply_in_place(&mut result, patch);
    result
}

/// Undo a patch: apply its diffs inverted, in reverse order
pub fn revert_patch(collection: &AgentCollection, patch: &Patch) -> AgentCollection {
    let mut result = collection.clone();
    for diff in patch.diffs().iter().rev() {
        apply_diff(&mut result, &diff.inverted());
    }
    result
}

/// Whether the patch carries no diffs
pub fn is_patch_empty(patch: &Patch) -> bool {
    patch.is_empty()
}

pub(crate) fn apply_in_place(collection: &mut AgentCollection, patch: &Patch) {
    for diff in patch.diffs() {
        apply_diff(collection, diff);
    }
}

fn apply_diff(collection: &mut AgentCollection, diff: &Diff) {
    if diff.path == FieldPath::Agent {
        apply_agent_diff(collection, diff);
        return;
    }

    let Some(agent) = collection
        .agents_mut()
        .iter_mut()
        .find(|a| a.name == diff.entity_name)
    else {
        trace!(agent = %diff.entity_name, diff_id = %diff.id, "agent absent, skipping field diff");
        return;
    };

    match diff.operation {
        Operation::Modify => {
            let value = diff.after.as_ref().and_then(DiffValue::as_text);
            match (diff.path.scalar_mut(agent), value) {
                (Some(field), Some(value)) => *field = value.to_string(),
                _ => skip(diff, "modify needs a scalar path and a text value"),
            }
        }
        Operation::Add => {
            let value = diff.after.as_ref().and_then(DiffValue::as_text);
            match (diff.path.set_mut(agent), value) {
                (Some(values), Some(value)) => {
                    if values.iter().any(|v| v == value) {
                        trace!(agent = %diff.entity_name, path = %diff.path, "value already present");
                    } else {
                        values.push(value.to_string());
                    }
                }
                _ => skip(diff, "add needs a set path and a text value"),
            }
        }
        Operation::Remove => {
            let value = diff.before.as_ref().and_then(DiffValue::as_text);
            match (diff.path.set_mut(agent), value) {
                (Some(values), Some(value)) => {
                    if let Some(pos) = values.iter().position(|v| v == value) {
                        values.remove(pos);
                    }
                }
                _ => skip(diff, "remove needs a set path and a text value"),
            }
        }
    }
}

fn apply_agent_diff(collection: &mut AgentCollection, diff: &Diff) {
    match diff.operation {
        Operation::Add => match diff.after.as_ref().and_then(DiffValue::as_agent) {
            Some(agent) if collection.contains(&diff.entity_name) => {
                warn!(agent = %agent.name, diff_id = %diff.id, "agent already exists, skipping add");
            }
            Some(agent) => collection.push(agent.clone()),
            None => skip(diff, "agent add carries no agent value"),
        },
        Operation::Remove => {
            collection
                .agents_mut()
                .retain(|a| a.name != diff.entity_name);
        }
        Operation::Modify => skip(diff, "agent-level diffs cannot modify"),
    }
}

fn skip(diff: &Diff, reason: &str) {
    warn!(
        diff_id = %diff.id,
        agent = %diff.entity_name,
        path = %diff.path,
        operation = %diff.operation,
        reason,
        "skipping malformed diff"
    );
}
