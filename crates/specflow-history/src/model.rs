//! Agent spec document model
//!
//! An [`AgentCollection`] is an ordered list of [`Agent`] records keyed by
//! name. List fields (capabilities, constraints, communication targets) keep
//! their order on disk but compare as sets.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

/// Who an agent may exchange messages with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communication {
    /// Agents this agent may send to
    #[serde(default)]
    pub can_send_to: Vec<String>,
    /// Agents this agent may receive from
    #[serde(default)]
    pub can_receive_from: Vec<String>,
}

/// One structured agent record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique key within a collection
    pub name: String,
    /// Human-readable name
    #[serde(default)]
    pub display_name: String,
    /// Free-text role description
    #[serde(default)]
    pub role: String,
    /// Capability tags
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Free-text rules the agent must follow
    #[serde(default)]
    pub constraints: Vec<String>,
    /// Communication permissions
    #[serde(default)]
    pub communication: Communication,
}

impl Agent {
    /// Create an agent with the given name and empty fields
    pub fn new(name: impl Into<String>) -> Self {
        Agent {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the role
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Set the capability tags
    pub fn with_capabilities<I, S>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.capabilities = capabilities.into_iter().map(Into::into).collect();
        self
    }

    /// Set the constraints
    pub fn with_constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints = constraints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the agents this one may send to
    pub fn with_send_to<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.communication.can_send_to = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the agents this one may receive from
    pub fn with_receive_from<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.communication.can_receive_from = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Compare two agents with set semantics on list fields
    pub fn equivalent(&self, other: &Agent) -> bool {
        self.name == other.name
            && self.display_name == other.display_name
            && self.role == other.role
            && same_members(&self.capabilities, &other.capabilities)
            && same_members(&self.constraints, &other.constraints)
            && same_members(
                &self.communication.can_send_to,
                &other.communication.can_send_to,
            )
            && same_members(
                &self.communication.can_receive_from,
                &other.communication.can_receive_from,
            )
    }
}

fn same_members(a: &[String], b: &[String]) -> bool {
    let a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b: HashSet<&str> = b.iter().map(String::as_str).collect();
    a == b
}

/// A name-keyed collection of agents
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentCollection {
    agents: Vec<Agent>,
}

impl AgentCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Agents in document order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Mutable access for the patch applier
    pub(crate) fn agents_mut(&mut self) -> &mut Vec<Agent> {
        &mut self.agents
    }

    /// Consume the collection
    pub fn into_agents(self) -> Vec<Agent> {
        self.agents
    }

    /// Find an agent by name
    pub fn get(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Whether an agent with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Append an agent
    pub fn push(&mut self, agent: Agent) {
        self.agents.push(agent);
    }

    /// Number of agents
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the collection has no agents
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Iterate agents in document order
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    /// Name-keyed lookup table; with duplicate names the last one wins
    pub(crate) fn by_name(&self) -> HashMap<&str, &Agent> {
        self.agents.iter().map(|a| (a.name.as_str(), a)).collect()
    }

    /// Semantic equality: same agent names, each agent equivalent,
    /// independent of agent order and list-field order.
    pub fn equivalent(&self, other: &AgentCollection) -> bool {
        let ours = self.by_name();
        let theirs = other.by_name();
        ours.len() == theirs.len()
            && ours.iter().all(|(name, agent)| {
                theirs
                    .get(name)
                    .is_some_and(|other_agent| agent.equivalent(other_agent))
            })
    }
}

impl From<Vec<Agent>> for AgentCollection {
    fn from(agents: Vec<Agent>) -> Self {
        AgentCollection { agents }
    }
}

impl FromIterator<Agent> for AgentCollection {
    fn from_iter<I: IntoIterator<Item = Agent>>(iter: I) -> Self {
        AgentCollection {
            agents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AgentCollection {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

/// Check a collection for duplicate agent names and duplicate set entries
///
/// The diff engine assumes well-formed input; this is offered to callers
/// that want to reject malformed documents before committing them.
pub fn validate_collection(collection: &AgentCollection) -> Result<(), HistoryError> {
    let mut seen = HashSet::new();
    for agent in collection {
        if agent.name.is_empty() {
            return Err(HistoryError::validation_error("agent name cannot be empty"));
        }
        if !seen.insert(agent.name.as_str()) {
            return Err(HistoryError::validation_error(format!(
                "duplicate agent name: {}",
                agent.name
            )));
        }

        let fields = [
            ("capabilities", agent.capabilities.as_slice()),
            ("constraints", agent.constraints.as_slice()),
            (
                "communication.canSendTo",
                agent.communication.can_send_to.as_slice(),
            ),
            (
                "communication.canReceiveFrom",
                agent.communication.can_receive_from.as_slice(),
            ),
        ];
        for (field, values) in fields {
            let mut unique = HashSet::new();
            if let Some(dup) = values.iter().find(|v| !unique.insert(v.as_str())) {
                return Err(HistoryError::validation_error(format!(
                    "duplicate value '{}' in {}.{}",
                    dup, agent.name, field
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_serializes_camel_case() {
        let agent = Agent::new("planner")
            .with_display_name("Planner")
            .with_send_to(["coder"]);
        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["displayName"], "Planner");
        assert_eq!(json["communication"]["canSendTo"][0], "coder");
        assert!(json["communication"]["canReceiveFrom"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_agent_deserializes_with_missing_fields() {
        let agent: Agent = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert_eq!(agent, Agent::new("a"));
    }

    #[test]
    fn test_collection_serializes_as_array() {
        let collection = AgentCollection::from(vec![Agent::new("a"), Agent::new("b")]);
        let json = serde_json::to_value(&collection).unwrap();
        assert!(json.is_array());
        assert_eq!(json.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_equivalent_ignores_order() {
        let left = AgentCollection::from(vec![
            Agent::new("a").with_capabilities(["x", "y"]),
            Agent::new("b"),
        ]);
        let right = AgentCollection::from(vec![
            Agent::new("b"),
            Agent::new("a").with_capabilities(["y", "x"]),
        ]);
        assert!(left.equivalent(&right));
        assert_ne!(left, right);
    }

    #[test]
    fn test_equivalent_detects_field_difference() {
        let left = AgentCollection::from(vec![Agent::new("a").with_role("plan")]);
        let right = AgentCollection::from(vec![Agent::new("a").with_role("code")]);
        assert!(!left.equivalent(&right));
    }

    #[test]
    fn test_equivalent_detects_missing_agent() {
        let left = AgentCollection::from(vec![Agent::new("a"), Agent::new("b")]);
        let right = AgentCollection::from(vec![Agent::new("a")]);
        assert!(!left.equivalent(&right));
        assert!(!right.equivalent(&left));
    }

    #[test]
    fn test_validate_rejects_duplicate_names() {
        let collection = AgentCollection::from(vec![Agent::new("a"), Agent::new("a")]);
        let err = validate_collection(&collection).unwrap_err();
        assert!(matches!(err, HistoryError::Validation(msg) if msg.contains("duplicate agent name")));
    }

    #[test]
    fn test_validate_rejects_duplicate_set_values() {
        let collection =
            AgentCollection::from(vec![Agent::new("a").with_constraints(["no pii", "no pii"])]);
        let err = validate_collection(&collection).unwrap_err();
        assert!(matches!(err, HistoryError::Validation(msg) if msg.contains("a.constraints")));
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let collection = AgentCollection::from(vec![
            Agent::new("a").with_capabilities(["x"]),
            Agent::new("b").with_capabilities(["x"]),
        ]);
        assert!(validate_collection(&collection).is_ok());
    }
}
