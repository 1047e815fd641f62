// List committed patches

use specflow_history::PatchEntry;

use super::{Command, Context};
use crate::error::{CliError, CliResult};
use crate::output::{print_info, OutputStyle};

/// List patches, marking the current position
pub struct LogCommand {
    json: bool,
}

impl LogCommand {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Render entries as text, newest last
    pub fn render(entries: &[PatchEntry], current: Option<usize>, style: &OutputStyle) -> String {
        let mut lines = Vec::with_capacity(entries.len() + 1);
        let baseline_marker = if current.is_none() { "*" } else { " " };
        lines.push(format!("{} {:>3}  {}", baseline_marker, "-", style.header("baseline")));

        for entry in entries {
            let marker = if Some(entry.index) == current { "*" } else { " " };
            let name = if entry.applied {
                entry.name.clone()
            } else {
                format!("{} (undone)", entry.name)
            };
            lines.push(format!(
                "{} {:>3}  {}  [{}]  {}",
                marker,
                entry.index + 1,
                style.code(&entry.id),
                style.impact(entry.impact),
                name
            ));
        }
        lines.join("\n")
    }
}

impl Command for LogCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let history = ctx.open_history()?;
        let entries = history.entries();

        if self.json {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| CliError::Internal(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        if entries.is_empty() {
            print_info("No patches recorded");
            return Ok(());
        }
        println!(
            "{}",
            Self::render(&entries, history.current_index(), &OutputStyle::default())
        );
        Ok(())
    }
}
