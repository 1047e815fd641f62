// Discard the whole history

use super::{report_persistence, Command, Context};
use crate::error::CliResult;
use crate::output::print_success;

/// Reset history to the pristine state
pub struct ClearCommand;

impl ClearCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ClearCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ClearCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let mut history = ctx.open_history()?;
        let count = history.patches().len();
        let (_, persistence) = history.clear().into_parts();
        report_persistence(persistence);
        print_success(&format!("Cleared {} patches", count));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{CommitCommand, InitCommand};
    use super::*;
    use specflow_history::Agent;
    use tempfile::TempDir;

    #[test]
    fn test_clear_removes_history_file() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let v0 = write_collection(&dir, "v0.json", vec![Agent::new("a")]);
        let v1 = write_collection(&dir, "v1.json", vec![Agent::new("b")]);
        InitCommand::new(&v0).execute(&ctx).unwrap();
        CommitCommand::new(&v1).execute(&ctx).unwrap();
        assert!(ctx.config().history_path.exists());

        ClearCommand::new().execute(&ctx).unwrap();
        assert!(!ctx.config().history_path.exists());
        assert!(ctx.open_history().unwrap().patches().is_empty());
    }
}
