// Record the edited collection as a new patch

use std::path::PathBuf;

use specflow_history::{classify, validate_collection, Author, CommitOutcome, PatchOptions};

use super::{report_persistence, Command, Context};
use crate::error::{CliError, CliResult};
use crate::output::{print_info, print_success, print_warning, OutputStyle};

/// Diff a collection file against the current state and commit the result
pub struct CommitCommand {
    file: PathBuf,
    name: Option<String>,
    author: Option<String>,
    rationale: Option<String>,
}

impl CommitCommand {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            name: None,
            author: None,
            rationale: None,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_rationale(mut self, rationale: Option<String>) -> Self {
        self.rationale = rationale;
        self
    }

    fn parse_author(&self) -> CliResult<Author> {
        match self.author.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("human") => Ok(Author::Human),
            Some("ai") => Ok(Author::Ai),
            Some("system") => Ok(Author::System),
            Some(other) => Err(CliError::InvalidArgument {
                message: format!("unknown author '{}', expected human, ai or system", other),
            }),
        }
    }
}

impl Command for CommitCommand {
    fn execute(&self, ctx: &Context) -> CliResult<()> {
        let author = self.parse_author()?;
        let after = ctx.read_collection(&self.file)?;
        if let Err(err) = validate_collection(&after) {
            print_warning(&format!("{}; committing anyway", err));
        }

        let mut history = ctx.open_history()?;
        let before = history.current_state().clone();

        let mut options = PatchOptions {
            name: self.name.clone(),
            author,
            ..Default::default()
        };
        if let Some(rationale) = &self.rationale {
            options = options.with_rationale(rationale.clone());
        }

        let (outcome, persistence) = history.commit_with(&before, &after, options).into_parts();
        report_persistence(persistence);

        match outcome {
            CommitOutcome::NothingToCommit => print_info("Nothing to commit"),
            CommitOutcome::Committed(patch) => {
                let style = OutputStyle::default();
                print_success(&format!(
                    "Committed {} ({} diffs, {} impact): {}",
                    style.code(patch.id()),
                    patch.diffs().len(),
                    style.impact(classify(&patch)),
                    patch.name()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::InitCommand;
    use super::*;
    use specflow_history::{Agent, Impact};
    use tempfile::TempDir;

    #[test]
    fn test_commit_records_patch() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let base = write_collection(&dir, "base.json", vec![Agent::new("a")]);
        let edit = write_collection(
            &dir,
            "edit.json",
            vec![Agent::new("a").with_constraints(["x"])],
        );

        InitCommand::new(&base).execute(&ctx).unwrap();
        CommitCommand::new(&edit)
            .with_name(Some("add constraint".into()))
            .with_author(Some("ai".into()))
            .execute(&ctx)
            .unwrap();

        let history = ctx.open_history().unwrap();
        assert_eq!(history.patches().len(), 1);
        let patch = &history.patches()[0];
        assert_eq!(patch.name(), "add constraint");
        assert_eq!(patch.metadata.author, Author::Ai);
        assert_eq!(classify(patch), Impact::High);
    }

    #[test]
    fn test_commit_identical_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let base = write_collection(&dir, "base.json", vec![Agent::new("a")]);

        InitCommand::new(&base).execute(&ctx).unwrap();
        CommitCommand::new(&base).execute(&ctx).unwrap();

        assert!(ctx.open_history().unwrap().patches().is_empty());
    }

    #[test]
    fn test_commit_rejects_unknown_author() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let base = write_collection(&dir, "base.json", vec![Agent::new("a")]);

        let err = CommitCommand::new(&base)
            .with_author(Some("robot".into()))
            .execute(&ctx)
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }
}
