// specflow CLI library
//! Command-line front end for agent collection history

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use commands::{Command, Context};
pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter, Commands};
