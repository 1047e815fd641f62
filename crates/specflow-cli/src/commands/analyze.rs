// Report on constraints, capabilities and communication links

use std::collections::BTreeSet;
use std::path::PathBuf;

use specflow_history::{
    communication_graph, extract_all_capabilities, extract_all_constraints, isolated_agents,
    validate_collection, AgentCollection,
};

use super::{Command, Context};
use crate::error::CliResult;
use crate::output::OutputStyle;

/// Analyze a collection file, or the current history state
pub struct AnalyzeCommand {
    file: Option<PathBuf>,
}

impl AnalyzeCommand {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    /// Build the report text
    pub fn report(collection: &AgentCollection, style: &OutputStyle) -> String {
        let mut out = Vec::new();
        out.push(style.header(&format!("{} agents", collection.len())));

        let constraints: BTreeSet<String> = extract_all_constraints(collection).into_iter().collect();
        out.push(format!("Constraints ({}):", constraints.len()));
        out.extend(constraints.iter().map(|c| format!("  - {}", c)));

        let capabilities: BTreeSet<String> =
            extract_all_capabilities(collection).into_iter().collect();
        out.push(format!("Capabilities ({}):", capabilities.len()));
        out.extend(capabilities.iter().map(|c| format!("  - {}", c)));

        let edges = communication_graph(collection);
        out.push(format!("Communication ({} links):", edges.len()));
        out.extend(edges.iter().map(|e| format!("  {} -> {}", e.from, e.to)));

        let isolated = isolated_agents(collection);
        if !isolated.is_empty() {
            out.push(style.warning(&format!("Isolated agents: {}", isolated.join(", "))));
        }
        if let Err(err) = validate_collection(collection) {
            out.push(style.warning(&err.to_string()));
        }
        out.join("\n")
    }
}

impl Command for AnalyzeCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let collection = match &self.file {
            Some(path) => ctx.read_collection(path)?,
            None => ctx.open_history()?.current_state().clone(),
        };
        println!("{}", Self::report(&collection, &OutputStyle::default()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use specflow_history::Agent;

    #[test]
    fn test_report() {
        let collection = AgentCollection::from(vec![
            Agent::new("planner")
                .with_constraints(["no pii"])
                .with_capabilities(["plan"])
                .with_send_to(["coder"]),
            Agent::new("coder").with_constraints(["no pii"]),
            Agent::new("loner"),
        ]);
        let report = AnalyzeCommand::report(&collection, &OutputStyle::plain());

        assert!(report.starts_with("3 agents"));
        assert!(report.contains("Constraints (1):\n  - no pii"));
        assert!(report.contains("planner -> coder"));
        assert!(report.contains("Isolated agents: loner"));
    }

    #[test]
    fn test_report_flags_duplicates() {
        let collection = AgentCollection::from(vec![Agent::new("a"), Agent::new("a")]);
        let report = AnalyzeCommand::report(&collection, &OutputStyle::plain());
        assert!(report.contains("duplicate agent name: a"));
    }
}
