// Move through history: undo, redo and revert

use specflow_history::{AgentCollection, HistoryError, HistoryManager, Transition};

use super::{report_persistence, Command, Context};
use crate::error::CliResult;
use crate::output::{print_info, print_success};

/// Which way to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Undo,
    Redo,
    RevertTo(String),
}

/// Undo, redo or jump to a patch
pub struct NavigateCommand {
    navigation: Navigation,
}

impl NavigateCommand {
    pub fn new(navigation: Navigation) -> Self {
        Self { navigation }
    }

    fn run(
        &self,
        history: &mut HistoryManager,
    ) -> Result<Transition<AgentCollection>, HistoryError> {
        match &self.navigation {
            Navigation::Undo => history.undo(),
            Navigation::Redo => history.redo(),
            Navigation::RevertTo(id) => history.revert_to(id),
        }
    }
}

impl Command for NavigateCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let mut history = ctx.open_history()?;

        let transition = match self.run(&mut history) {
            Ok(transition) => transition,
            // Running off either end or naming an unknown patch is not a failure
            Err(err) if err.is_navigation_noop() => {
                print_info(&err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let (collection, persistence) = transition.into_parts();
        report_persistence(persistence);

        let position = match history.current_index() {
            Some(index) => format!("patch {} of {}", index + 1, history.patches().len()),
            None => "baseline".to_string(),
        };
        let verb = match self.navigation {
            Navigation::Undo => "Undid",
            Navigation::Redo => "Redid",
            Navigation::RevertTo(_) => "Reverted",
        };
        print_success(&format!(
            "{} to {} ({} agents)",
            verb,
            position,
            collection.len()
        ));
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

    fn setup(dir: &TempDir) -> Context {
        let ctx = context(dir);
        let v0 = write_collection(dir, "v0.json", vec![Agent::new("a")]);
        let v1 = write_collection(dir, "v1.json", vec![Agent::new("a").with_role("one")]);
        let v2 = write_collection(dir, "v2.json", vec![Agent::new("a").with_role("two")]);
        InitCommand::new(&v0).execute(&ctx).unwrap();
        CommitCommand::new(&v1).execute(&ctx).unwrap();
        CommitCommand::new(&v2).execute(&ctx).unwrap();
        ctx
    }

    #[test]
    fn test_undo_and_redo_persist() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir);

        NavigateCommand::new(Navigation::Undo).execute(&ctx).unwrap();
        let history = ctx.open_history().unwrap();
        assert_eq!(history.current_index(), Some(0));
        assert_eq!(history.current_state().get("a").unwrap().role, "one");

        NavigateCommand::new(Navigation::Redo).execute(&ctx).unwrap();
        assert_eq!(ctx.open_history().unwrap().current_index(), Some(1));
    }

    #[test]
    fn test_boundary_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir);

        assert!(NavigateCommand::new(Navigation::Redo).execute(&ctx).is_ok());
        for _ in 0..3 {
            assert!(NavigateCommand::new(Navigation::Undo).execute(&ctx).is_ok());
        }
        assert_eq!(ctx.open_history().unwrap().current_index(), None);
    }

    #[test]
    fn test_revert_to_patch() {
        let dir = TempDir::new().unwrap();
        let ctx = setup(&dir);
        let first = ctx.open_history().unwrap().patches()[0].id().to_string();

        NavigateCommand::new(Navigation::RevertTo(first))
            .execute(&ctx)
            .unwrap();
        let history = ctx.open_history().unwrap();
        assert_eq!(history.current_index(), Some(0));
        assert!(history.can_redo());

        assert!(NavigateCommand::new(Navigation::RevertTo("patch-missing".into()))
            .execute(&ctx)
            .is_ok());
    }
}
