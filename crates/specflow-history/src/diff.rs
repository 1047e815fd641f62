//! Diff and patch types, and the diff generator
//!
//! [`generate_patch`] compares two collections and emits diffs in a fixed
//! order so that the same inputs always yield the same diff sequence:
//!
//! 1. agents removed (in `before` order)
//! 2. agents added (in `after` order)
//! 3. field changes for agents present in both, walking agents in `after`
//!    order and comparing fields as role, displayName, constraints,
//!    capabilities, canSendTo, canReceiveFrom
//!
//! Within a set field, removes come first in `before` order, one per
//! occurrence of the value, then adds in `after` order, one per distinct
//! value.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Agent, AgentCollection};

/// Maximum length of a patch name derived from its summary
const DERIVED_NAME_MAX_CHARS: usize = 50;

/// Summary used for a patch with no diffs
pub const NO_CHANGES_SUMMARY: &str = "no changes";

/// Kind of change carried by a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Something was added
    Add,
    /// Something was removed
    Remove,
    /// A scalar value was replaced
    Modify,
}

impl Operation {
    /// The operation that undoes this one
    pub fn inverse(self) -> Self {
        match self {
            Operation::Add => Operation::Remove,
            Operation::Remove => Operation::Add,
            Operation::Modify => Operation::Modify,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Add => write!(f, "add"),
            Operation::Remove => write!(f, "remove"),
            Operation::Modify => write!(f, "modify"),
        }
    }
}

/// Severity of a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Cosmetic
    Low,
    /// Behavioral
    Medium,
    /// Structural or safety-relevant
    High,
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

/// Who produced a patch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    /// A person in the editor
    #[default]
    Human,
    /// A generation model
    Ai,
    /// The application itself
    System,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Human => write!(f, "human"),
            Author::Ai => write!(f, "ai"),
            Author::System => write!(f, "system"),
        }
    }
}

/// What a diff addresses: a whole agent or one diffable field
///
/// Serialized with the path strings used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldPath {
    /// The whole agent record
    #[serde(rename = "agent")]
    Agent,
    /// Agent role
    #[serde(rename = "spec.role")]
    Role,
    /// Display name
    #[serde(rename = "spec.displayName")]
    DisplayName,
    /// Constraint set
    #[serde(rename = "spec.constraints[]")]
    Constraints,
    /// Capability set
    #[serde(rename = "spec.capabilities[]")]
    Capabilities,
    /// Send targets
    #[serde(rename = "spec.communication.canSendTo[]")]
    CanSendTo,
    /// Receive sources
    #[serde(rename = "spec.communication.canReceiveFrom[]")]
    CanReceiveFrom,
}

impl FieldPath {
    /// Field comparison order used by the generator
    pub const FIELD_ORDER: [FieldPath; 6] = [
        FieldPath::Role,
        FieldPath::DisplayName,
        FieldPath::Constraints,
        FieldPath::Capabilities,
        FieldPath::CanSendTo,
        FieldPath::CanReceiveFrom,
    ];

    /// Wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            FieldPath::Agent => "agent",
            FieldPath::Role => "spec.role",
            FieldPath::DisplayName => "spec.displayName",
            FieldPath::Constraints => "spec.constraints[]",
            FieldPath::Capabilities => "spec.capabilities[]",
            FieldPath::CanSendTo => "spec.communication.canSendTo[]",
            FieldPath::CanReceiveFrom => "spec.communication.canReceiveFrom[]",
        }
    }

    /// Whether the path addresses a list field compared as a set
    pub fn is_set_field(self) -> bool {
        matches!(
            self,
            FieldPath::Constraints
                | FieldPath::Capabilities
                | FieldPath::CanSendTo
                | FieldPath::CanReceiveFrom
        )
    }

    /// Impact assigned by the generator to changes on this path
    pub fn default_impact(self) -> Impact {
        match self {
            FieldPath::Agent => Impact::High,
            FieldPath::Role => Impact::Medium,
            FieldPath::DisplayName => Impact::Low,
            FieldPath::Constraints => Impact::Medium,
            FieldPath::Capabilities => Impact::Low,
            FieldPath::CanSendTo | FieldPath::CanReceiveFrom => Impact::Medium,
        }
    }

    /// Read a scalar field
    pub(crate) fn scalar<'a>(self, agent: &'a Agent) -> Option<&'a str> {
        match self {
            FieldPath::Role => Some(agent.role.as_str()),
            FieldPath::DisplayName => Some(agent.display_name.as_str()),
            _ => None,
        }
    }

    /// Mutable access to a scalar field
    pub(crate) fn scalar_mut(self, agent: &mut Agent) -> Option<&mut String> {
        match self {
            FieldPath::Role => Some(&mut agent.role),
            FieldPath::DisplayName => Some(&mut agent.display_name),
            _ => None,
        }
    }

    /// Read a set field
    pub(crate) fn set<'a>(self, agent: &'a Agent) -> Option<&'a [String]> {
        match self {
            FieldPath::Constraints => Some(agent.constraints.as_slice()),
            FieldPath::Capabilities => Some(agent.capabilities.as_slice()),
            FieldPath::CanSendTo => Some(agent.communication.can_send_to.as_slice()),
            FieldPath::CanReceiveFrom => Some(agent.communication.can_receive_from.as_slice()),
            _ => None,
        }
    }

    /// Mutable access to a set field
    pub(crate) fn set_mut(self, agent: &mut Agent) -> Option<&mut Vec<String>> {
        match self {
            FieldPath::Constraints => Some(&mut agent.constraints),
            FieldPath::Capabilities => Some(&mut agent.capabilities),
            FieldPath::CanSendTo => Some(&mut agent.communication.can_send_to),
            FieldPath::CanReceiveFrom => Some(&mut agent.communication.can_receive_from),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value carried on either side of a diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiffValue {
    /// A whole agent (agent-level add/remove)
    Agent(Agent),
    /// A scalar value or one set element
    Text(String),
}

impl DiffValue {
    /// The agent, if this is an agent value
    pub fn as_agent(&self) -> Option<&Agent> {
        match self {
            DiffValue::Agent(agent) => Some(agent),
            DiffValue::Text(_) => None,
        }
    }

    /// The text, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DiffValue::Text(text) => Some(text),
            DiffValue::Agent(_) => None,
        }
    }
}

/// One atomic change to an agent or one of its fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    /// Unique identifier
    pub id: String,
    /// Name of the agent the change belongs to
    #[serde(rename = "agentName")]
    pub entity_name: String,
    /// Kind of change
    pub operation: Operation,
    /// What the change addresses
    pub path: FieldPath,
    /// Value before the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DiffValue>,
    /// Value after the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<DiffValue>,
    /// Severity assigned by the generator
    pub impact: Impact,
}

impl Diff {
    /// Create a diff with a fresh id
    pub fn new(
        entity_name: impl Into<String>,
        operation: Operation,
        path: FieldPath,
        before: Option<DiffValue>,
        after: Option<DiffValue>,
        impact: Impact,
    ) -> Self {
        Diff {
            id: format!("diff-{}", Uuid::new_v4().simple()),
            entity_name: entity_name.into(),
            operation,
            path,
            before,
            after,
            impact,
        }
    }

    /// The diff that undoes this one: operation inverted, sides swapped
    pub fn inverted(&self) -> Self {
        Diff {
            id: self.id.clone(),
            entity_name: self.entity_name.clone(),
            operation: self.operation.inverse(),
            path: self.path,
            before: self.after.clone(),
            after: self.before.clone(),
            impact: self.impact,
        }
    }

    /// Whether the diff addresses a whole agent
    pub fn is_agent_level(&self) -> bool {
        self.path == FieldPath::Agent
    }
}

/// Envelope kind tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchKind {
    /// The only kind
    #[default]
    SpecPatch,
}

/// Envelope version tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatchVersion {
    /// First wire version
    #[default]
    #[serde(rename = "v1")]
    V1,
}

/// Identity and provenance of a patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchMetadata {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Who produced the patch
    pub author: Author,
}

/// The change content of a patch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBody {
    /// Ordered diffs
    pub diffs: Vec<Diff>,
    /// Derived human-readable summary
    pub summary: String,
    /// Why the change was made
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// When a companion system applied the patch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

/// A named, ordered group of diffs representing one committed edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    /// Envelope kind
    #[serde(default)]
    pub kind: PatchKind,
    /// Envelope version
    #[serde(default)]
    pub version: PatchVersion,
    /// Identity and provenance
    pub metadata: PatchMetadata,
    /// The changes
    pub spec: PatchBody,
}

impl Patch {
    /// Build a patch from diffs, deriving the summary and (if absent) the name
    pub fn from_diffs(diffs: Vec<Diff>, options: PatchOptions) -> Self {
        let summary = summarize(&diffs);
        let name = options
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| summary.chars().take(DERIVED_NAME_MAX_CHARS).collect());

        Patch {
            kind: PatchKind::SpecPatch,
            version: PatchVersion::V1,
            metadata: PatchMetadata {
                id: format!("patch-{}", Uuid::new_v4().simple()),
                name,
                created_at: Utc::now(),
                author: options.author,
            },
            spec: PatchBody {
                diffs,
                summary,
                rationale: options.rationale,
                applied_at: None,
            },
        }
    }

    /// Patch id
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    /// Patch name
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Ordered diffs
    pub fn diffs(&self) -> &[Diff] {
        &self.spec.diffs
    }

    /// Derived summary
    pub fn summary(&self) -> &str {
        &self.spec.summary
    }

    /// Whether the patch carries no diffs
    pub fn is_empty(&self) -> bool {
        self.spec.diffs.is_empty()
    }

    /// Distinct agent names touched by the patch, in first-seen order
    pub fn affected_agents(&self) -> Vec<&str> {
        distinct_names(&self.spec.diffs)
    }
}

/// Optional inputs to [`generate_patch`]
#[derive(Debug, Clone, Default)]
pub struct PatchOptions {
    /// Patch name; derived from the summary when absent
    pub name: Option<String>,
    /// Who produced the change
    pub author: Author,
    /// Why the change was made
    pub rationale: Option<String>,
}

impl PatchOptions {
    /// Options with an explicit name
    pub fn named(name: impl Into<String>) -> Self {
        PatchOptions {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Set the author
    pub fn with_author(mut self, author: Author) -> Self {
        self.author = author;
        self
    }

    /// Set the rationale
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }
}

/// Compute the patch that turns `before` into `after`
///
/// The returned patch may be empty; callers check [`Patch::is_empty`].
pub fn generate_patch(
    before: &AgentCollection,
    after: &AgentCollection,
    options: PatchOptions,
) -> Patch {
    Patch::from_diffs(generate_diffs(before, after), options)
}

/// Compute the ordered diff list between two collections
pub fn generate_diffs(before: &AgentCollection, after: &AgentCollection) -> Vec<Diff> {
    let before_map = before.by_name();
    let after_map = after.by_name();
    let mut diffs = Vec::new();

    for agent in unique_by_name(before) {
        if !after_map.contains_key(agent.name.as_str()) {
            diffs.push(Diff::new(
                &agent.name,
                Operation::Remove,
                FieldPath::Agent,
                Some(DiffValue::Agent(agent.clone())),
                None,
                FieldPath::Agent.default_impact(),
            ));
        }
    }

    for agent in unique_by_name(after) {
        if !before_map.contains_key(agent.name.as_str()) {
            diffs.push(Diff::new(
                &agent.name,
                Operation::Add,
                FieldPath::Agent,
                None,
                Some(DiffValue::Agent(agent.clone())),
                FieldPath::Agent.default_impact(),
            ));
        }
    }

    for after_agent in unique_by_name(after) {
        if let Some(before_agent) = before_map.get(after_agent.name.as_str()) {
            diffs.extend(field_diffs(before_agent, after_agent));
        }
    }

    diffs
}

/// Agents in document order, one per name (the last definition of a name wins)
fn unique_by_name(collection: &AgentCollection) -> Vec<&Agent> {
    let map = collection.by_name();
    let mut seen = HashSet::new();
    collection
        .iter()
        .filter(|agent| seen.insert(agent.name.as_str()))
        .filter_map(|agent| map.get(agent.name.as_str()).copied())
        .collect()
}

fn field_diffs(before: &Agent, after: &Agent) -> Vec<Diff> {
    let mut diffs = Vec::new();

    for path in FieldPath::FIELD_ORDER {
        if let (Some(old), Some(new)) = (path.scalar(before), path.scalar(after)) {
            if old != new {
                diffs.push(Diff::new(
                    &after.name,
                    Operation::Modify,
                    path,
                    Some(DiffValue::Text(old.to_string())),
                    Some(DiffValue::Text(new.to_string())),
                    path.default_impact(),
                ));
            }
        } else if let (Some(old), Some(new)) = (path.set(before), path.set(after)) {
            diffs.extend(set_diffs(&after.name, path, old, new));
        }
    }

    diffs
}

/// Removes (in `before` order) then adds (in `after` order)
///
/// A removed value gets one diff per occurrence, so applying the removes
/// clears every copy. An added value gets one diff.
fn set_diffs(agent_name: &str, path: FieldPath, before: &[String], after: &[String]) -> Vec<Diff> {
    let before_set: HashSet<&str> = before.iter().map(String::as_str).collect();
    let after_set: HashSet<&str> = after.iter().map(String::as_str).collect();
    let impact = path.default_impact();
    let mut diffs = Vec::new();

    for item in before {
        if !after_set.contains(item.as_str()) {
            diffs.push(Diff::new(
                agent_name,
                Operation::Remove,
                path,
                Some(DiffValue::Text(item.clone())),
                None,
                impact,
            ));
        }
    }

    let mut emitted = HashSet::new();
    for item in after {
        if !before_set.contains(item.as_str()) && emitted.insert(item.as_str()) {
            diffs.push(Diff::new(
                agent_name,
                Operation::Add,
                path,
                None,
                Some(DiffValue::Text(item.clone())),
                impact,
            ));
        }
    }

    diffs
}

fn distinct_names<'a>(diffs: impl IntoIterator<Item = &'a Diff>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    diffs
        .into_iter()
        .map(|d| d.entity_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Human-readable summary of a diff list
///
/// Lists added and removed agents, then the number of field changes and the
/// agents they touch. An empty list yields [`NO_CHANGES_SUMMARY`].
pub fn summarize(diffs: &[Diff]) -> String {
    if diffs.is_empty() {
        return NO_CHANGES_SUMMARY.to_string();
    }

    let agent_names = |op: Operation| -> Vec<&str> {
        diffs
            .iter()
            .filter(|d| d.is_agent_level() && d.operation == op)
            .map(|d| d.entity_name.as_str())
            .collect()
    };
    let added = agent_names(Operation::Add);
    let removed = agent_names(Operation::Remove);

    let field_changes: Vec<&Diff> = diffs.iter().filter(|d| !d.is_agent_level()).collect();

    let mut parts = Vec::new();
    if !added.is_empty() {
        parts.push(format!("added {}", added.join(", ")));
    }
    if !removed.is_empty() {
        parts.push(format!("removed {}", removed.join(", ")));
    }
    if !field_changes.is_empty() {
        let count = field_changes.len();
        parts.push(format!(
            "changed {} field{} on {}",
            count,
            if count == 1 { "" } else { "s" },
            distinct_names(field_changes.iter().copied()).join(", ")
        ));
    }

    parts.join(" / ")
}
