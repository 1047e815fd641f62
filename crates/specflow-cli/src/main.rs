// specflow CLI entry point

use anyhow::Context as _;
use clap::Parser;
use specflow_cli::{logging, output, Cli, CommandRouter, Context};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let ctx = Context::load(cli.config.as_deref(), cli.history.clone())
        .context("failed to load specflow configuration")?;
    logging::init_logging(cli.verbose, cli.quiet, &ctx.config().log_level);

    if let Err(e) = CommandRouter::execute(&cli, &ctx) {
        output::print_error(&e.user_message());
        if cli.verbose {
            eprintln!("{}", e.technical_details());
        }
        std::process::exit(1);
    }
    Ok(())
}
