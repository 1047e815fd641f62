// Set the history baseline from a collection file

use std::path::PathBuf;

use super::{report_persistence, Command, Context};
use crate::error::CliResult;
use crate::output::{print_info, print_success};

/// Set the baseline collection for a fresh history
pub struct InitCommand {
    file: PathBuf,
}

impl InitCommand {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }
}

impl Command for InitCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let collection = ctx.read_collection(&self.file)?;
        let mut history = ctx.open_history()?;

        if !history.patches().is_empty() {
            print_info(&format!(
                "History already has {} patches; baseline unchanged. Run 'specflow clear' to start over.",
                history.patches().len()
            ));
            return Ok(());
        }

        let agents = collection.len();
        let (_, persistence) = history.initialize(collection).into_parts();
        report_persistence(persistence);
        print_success(&format!("Initialized history with {} agents", agents));
        Ok(())
    }
}
