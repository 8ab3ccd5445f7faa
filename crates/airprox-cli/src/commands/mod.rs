//! Command implementations

mod fetch;
mod fix;
mod reset;
mod status;
mod watch;

use crate::cli::{Cli, Commands};
use crate::config::load_config;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Fetch(args) => fetch::execute(args, &config, &output).await,
        Commands::Fix(args) => fix::execute(args, &config, &output).await,
        Commands::Watch(args) => watch::execute(args, &config, &output).await,
        Commands::Status(args) => status::execute(args, &config, &output),
        Commands::Reset(args) => reset::execute(args, &config, &output),
    }
}
