// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::error::CliResult;

/// specflow - undo/redo history for agent spec collections
#[derive(Parser, Debug)]
#[command(name = "specflow")]
#[command(bin_name = "specflow")]
#[command(about = "Diff, commit and navigate the edit history of an agent collection")]
#[command(
    long_about = "specflow keeps a checkpointed patch history for a JSON array of agents.\n\nQuick start:\n  • specflow init agents.json      Set the baseline\n  • specflow commit agents.json    Record your edits as a patch\n  • specflow undo / redo           Move through history\n  • specflow log                   List patches"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// History file (overrides the configured path)
    #[arg(long, global = true, value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Set the baseline collection
    Init {
        /// JSON file with the starting agents
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Record the edited collection as a patch
    Commit {
        /// JSON file with the edited agents
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Patch name (derived from the summary when omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Who made the change: human, ai or system
        #[arg(short, long)]
        author: Option<String>,

        /// Why the change was made
        #[arg(short, long)]
        rationale: Option<String>,
    },

    /// Step back one patch
    Undo,

    /// Step forward one patch
    Redo,

    /// Jump to the state right after a patch
    Revert {
        /// Patch id as shown by `specflow log`
        #[arg(value_name = "PATCH_ID")]
        patch_id: String,
    },

    /// Print the current collection
    Show,

    /// List patches
    Log {
        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare two collection files
    Diff {
        #[arg(value_name = "BEFORE")]
        before: PathBuf,

        #[arg(value_name = "AFTER")]
        after: PathBuf,

        /// Print the patch as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize constraints, capabilities and communication
    Analyze {
        /// Collection file (defaults to the current history state)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Discard all history
    Clear,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Build the handler for a parsed command
    pub fn handler(command: &Commands) -> Box<dyn Command> {
        match command {
            Commands::Init { file } => Box::new(InitCommand::new(file.clone())),
            Commands::Commit {
                file,
                name,
                author,
                rationale,
            } => Box::new(
                CommitCommand::new(file.clone())
                    .with_name(name.clone())
                    .with_author(author.clone())
                    .with_rationale(rationale.clone()),
            ),
            Commands::Undo => Box::new(NavigateCommand::new(Navigation::Undo)),
            Commands::Redo => Box::new(NavigateCommand::new(Navigation::Redo)),
            Commands::Revert { patch_id } => Box::new(NavigateCommand::new(Navigation::RevertTo(
                patch_id.clone(),
            ))),
            Commands::Show => Box::new(ShowCommand::new()),
            Commands::Log { json } => Box::new(LogCommand::new(*json)),
            Commands::Diff {
                before,
                after,
                json,
            } => Box::new(DiffCommand::new(before.clone(), after.clone(), *json)),
            Commands::Analyze { file } => Box::new(AnalyzeCommand::new(file.clone())),
            Commands::Clear => Box::new(ClearCommand::new()),
        }
    }

    /// Execute a parsed command line against a context
    pub fn execute(cli: &Cli, ctx: &Context) -> CliResult<()> {
        Self::handler(&cli.command).execute(ctx)
    }
}
