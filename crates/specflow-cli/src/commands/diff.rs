// Compare two collection files without touching history

use std::path::PathBuf;

use specflow_history::{classify, describe_operations, generate_patch, PatchOptions};

use super::{Command, Context};
use crate::error::{CliError, CliResult};
use crate::output::{print_info, OutputStyle};

/// Print the patch that turns one collection file into another
pub struct DiffCommand {
    before: PathBuf,
    after: PathBuf,
    json: bool,
}

impl DiffCommand {
    pub fn new(before: impl Into<PathBuf>, after: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
            json,
        }
    }
}

impl Command for DiffCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let before = ctx.read_collection(&self.before)?;
        let after = ctx.read_collection(&self.after)?;
        let patch = generate_patch(&before, &after, PatchOptions::default());

        if self.json {
            let json = serde_json::to_string_pretty(&patch)
                .map_err(|e| CliError::Internal(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        if patch.is_empty() {
            print_info("No differences");
            return Ok(());
        }

        let style = OutputStyle::default();
        println!(
            "{} [{}]",
            style.header(&describe_operations(patch.diffs())),
            style.impact(classify(&patch))
        );
        for diff in patch.diffs() {
            println!("  {}", style.diff_line(diff));
        }
        Ok(())
    }
}
