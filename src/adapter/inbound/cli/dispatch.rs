//! Routes a parsed command line to its handler.

use super::command::{Cli, Commands};
use super::output::{self, OutputConfig};
use super::{check, once, run};
use crate::error::Result;

/// Apply global flags, then run the selected subcommand.
pub async fn execute(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet), cli.color);

    match cli.command {
        Commands::Run(args) => run::execute(&args.config).await,
        Commands::Once(args) => once::execute(&args.config).await,
        Commands::Check(args) => check::execute(&args.config),
    }
}
