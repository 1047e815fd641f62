//! Read-only queries over a collection

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::AgentCollection;

/// A directed "may send to" link between two agents
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommunicationEdge {
    /// Sender
    pub from: String,
    /// Receiver
    pub to: String,
}

/// Every constraint across all agents, in document order
///
/// Duplicates across agents are kept.
pub fn extract_all_constraints(collection: &AgentCollection) -> Vec<String> {
    collection
        .iter()
        .flat_map(|agent| agent.constraints.iter().cloned())
        .collect()
}

/// Every capability tag across all agents, in document order
pub fn extract_all_capabilities(collection: &AgentCollection) -> Vec<String> {
    collection
        .iter()
        .flat_map(|agent| agent.capabilities.iter().cloned())
        .collect()
}

/// Edges built from each agent's `canSendTo` list
pub fn communication_graph(collection: &AgentCollection) -> Vec<CommunicationEdge> {
    collection
        .iter()
        .flat_map(|agent| {
            agent
                .communication
                .can_send_to
                .iter()
                .map(move |target| CommunicationEdge {
                    from: agent.name.clone(),
                    to: target.clone(),
                })
        })
        .collect()
}

/// Agents that neither declare nor are named in any communication
pub fn isolated_agents(collection: &AgentCollection) -> Vec<&str> {
    let mut connected: HashSet<&str> = HashSet::new();
    for agent in collection {
        let comm = &agent.communication;
        if comm.can_send_to.is_empty() && comm.can_receive_from.is_empty() {
            continue;
        }
        connected.insert(agent.name.as_str());
        connected.extend(comm.can_send_to.iter().map(String::as_str));
        connected.extend(comm.can_receive_from.iter().map(String::as_str));
    }

    collection
        .iter()
        .map(|agent| agent.name.as_str())
        .filter(|name| !connected.contains(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Agent;

    fn team() -> AgentCollection {
        AgentCollection::from(vec![
            Agent::new("planner")
                .with_constraints(["no pii"])
                .with_capabilities(["plan"])
                .with_send_to(["coder"]),
            Agent::new("coder")
                .with_constraints(["no pii", "tests first"])
                .with_capabilities(["write", "exec"]),
            Agent::new("reviewer").with_receive_from(["coder"]),
            Agent::new("archivist"),
        ])
    }

    #[test]
    fn test_extract_all_constraints_keeps_duplicates() {
        assert_eq!(
            extract_all_constraints(&team()),
            vec!["no pii", "no pii", "tests first"]
        );
    }

    #[test]
    fn test_extract_all_capabilities() {
        assert_eq!(extract_all_capabilities(&team()), vec!["plan", "write", "exec"]);
    }

    #[test]
    fn test_communication_graph() {
        let edges = communication_graph(&team());
        assert_eq!(
            edges,
            vec![CommunicationEdge {
                from: "planner".into(),
                to: "coder".into()
            }]
        );
    }

    #[test]
    fn test_isolated_agents() {
        // coder is only named by others; archivist has no links at all
        assert_eq!(isolated_agents(&team()), vec!["archivist"]);
    }

    #[test]
    fn test_empty_collection() {
        let empty = AgentCollection::new();
        assert!(extract_all_constraints(&empty).is_empty());
        assert!(communication_graph(&empty).is_empty());
        assert!(isolated_agents(&empty).is_empty());
    }
}
