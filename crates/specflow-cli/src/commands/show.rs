// Print the collection at the current position

use super::{Command, Context};
use crate::error::{CliError, CliResult};

/// Print the current collection as JSON
pub struct ShowCommand;

impl ShowCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ShowCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl Command for ShowCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let history = ctx.open_history()?;
        let json = serde_json::to_string_pretty(history.current_state())
            .map_err(|e| CliError::Internal(e.to_string()))?;
        println!("{}", json);
        Ok(())
    }
}
