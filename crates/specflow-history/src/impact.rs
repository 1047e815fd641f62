//! Patch severity classification

use std::collections::HashSet;

use crate::diff::{Diff, FieldPath, Impact, Operation, Patch};

/// Assign a severity to a patch
///
/// Constraint edits always escalate to high regardless of how many agents
/// the patch touches.
pub fn classify(patch: &Patch) -> Impact {
    classify_diffs(patch.diffs())
}

/// Assign a severity to a bare diff list
pub fn classify_diffs(diffs: &[Diff]) -> Impact {
    let agents: HashSet<&str> = diffs.iter().map(|d| d.entity_name.as_str()).collect();
    let touches = |path: FieldPath| diffs.iter().any(|d| d.path == path);

    if touches(FieldPath::Constraints)
        || agents.len() > 2
        || diffs.iter().any(|d| d.impact == Impact::High)
    {
        return Impact::High;
    }

    if touches(FieldPath::Role) || touches(FieldPath::Capabilities) || agents.len() > 1 {
        return Impact::Medium;
    }

    Impact::Low
}

/// Compact operation-count summary, e.g. `"a, b: 2 added, 1 modified"`
///
/// Past two agents the rest are folded into `"and N more"`.
pub fn describe_operations(diffs: &[Diff]) -> String {
    if diffs.is_empty() {
        return crate::diff::NO_CHANGES_SUMMARY.to_string();
    }

    let count = |op: Operation| diffs.iter().filter(|d| d.operation == op).count();
    let mut parts = Vec::new();
    for (op, label) in [
        (Operation::Add, "added"),
        (Operation::Modify, "modified"),
        (Operation::Remove, "removed"),
    ] {
        let n = count(op);
        if n > 0 {
            parts.push(format!("{} {}", n, label));
        }
    }

    let mut seen = HashSet::new();
    let agents: Vec<&str> = diffs
        .iter()
        .map(|d| d.entity_name.as_str())
        .filter(|name| seen.insert(*name))
        .collect();
    let agent_text = if agents.len() <= 2 {
        agents.join(", ")
    } else {
        format!("{} and {} more", agents[..2].join(", "), agents.len() - 2)
    };

    format!("{}: {}", agent_text, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{generate_patch, DiffValue, PatchOptions};
    use crate::model::{Agent, AgentCollection};

    fn diff(agent: &str, path: FieldPath, op: Operation, impact: Impact) -> Diff {
        Diff::new(agent, op, path, None, Some(DiffValue::Text("v".into())), impact)
    }

    #[test]
    fn test_single_display_name_change_is_low() {
        let diffs = vec![diff("a", FieldPath::DisplayName, Operation::Modify, Impact::Low)];
        assert_eq!(classify_diffs(&diffs), Impact::Low);
    }

    #[test]
    fn test_constraint_change_is_high() {
        let diffs = vec![diff("a", FieldPath::Constraints, Operation::Add, Impact::Medium)];
        assert_eq!(classify_diffs(&diffs), Impact::High);
    }

    #[test]
    fn test_three_agents_is_high() {
        let diffs = vec![
            diff("a", FieldPath::DisplayName, Operation::Modify, Impact::Low),
            diff("b", FieldPath::DisplayName, Operation::Modify, Impact::Low),
            diff("c", FieldPath::DisplayName, Operation::Modify, Impact::Low),
        ];
        assert_eq!(classify_diffs(&diffs), Impact::High);
    }

    #[test]
    fn test_preassigned_high_is_high() {
        let diffs = vec![diff("a", FieldPath::Agent, Operation::Add, Impact::High)];
        assert_eq!(classify_diffs(&diffs), Impact::High);
    }

    #[test]
    fn test_role_or_capability_is_medium() {
        let role = vec![diff("a", FieldPath::Role, Operation::Modify, Impact::Medium)];
        let caps = vec![diff("a", FieldPath::Capabilities, Operation::Add, Impact::Low)];
        assert_eq!(classify_diffs(&role), Impact::Medium);
        assert_eq!(classify_diffs(&caps), Impact::Medium);
    }

    #[test]
    fn test_two_agents_is_medium() {
        let diffs = vec![
            diff("a", FieldPath::DisplayName, Operation::Modify, Impact::Low),
            diff("b", FieldPath::CanSendTo, Operation::Add, Impact::Medium),
        ];
        assert_eq!(classify_diffs(&diffs), Impact::Medium);
    }

    #[test]
    fn test_communication_only_is_low() {
        let diffs = vec![diff("a", FieldPath::CanSendTo, Operation::Add, Impact::Medium)];
        assert_eq!(classify_diffs(&diffs), Impact::Low);
    }

    #[test]
    fn test_empty_is_low() {
        assert_eq!(classify_diffs(&[]), Impact::Low);
    }

    #[test]
    fn test_classify_generated_constraint_patch() {
        let before = AgentCollection::from(vec![Agent::new("a")]);
        let after = AgentCollection::from(vec![Agent::new("a").with_constraints(["x"])]);
        let patch = generate_patch(&before, &after, PatchOptions::default());
        assert_eq!(classify(&patch), Impact::High);
    }

    #[test]
    fn test_describe_operations() {
        let diffs = vec![
            diff("a", FieldPath::Capabilities, Operation::Add, Impact::Low),
            diff("a", FieldPath::Capabilities, Operation::Add, Impact::Low),
            diff("b", FieldPath::Role, Operation::Modify, Impact::Medium),
        ];
        assert_eq!(describe_operations(&diffs), "a, b: 2 added, 1 modified");
    }

    #[test]
    fn test_describe_operations_folds_extra_agents() {
        let diffs = vec![
            diff("a", FieldPath::Agent, Operation::Remove, Impact::High),
            diff("b", FieldPath::Agent, Operation::Remove, Impact::High),
            diff("c", FieldPath::Agent, Operation::Remove, Impact::High),
            diff("d", FieldPath::Agent, Operation::Remove, Impact::High),
        ];
        assert_eq!(describe_operations(&diffs), "a, b and 2 more: 4 removed");
    }
}
