//! jamdesk-cli: preview rendering and staff jam actions from the terminal.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;

#[cfg(test)]
mod tests;

use clap::Parser;
use jamdesk::infra::telemetry;

use args::{Cli, Commands};
use client::{CliError, build_ctx_from_cli};
use handlers::{action, jams, preview};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli)?;
    telemetry::init(&ctx.settings.logging)?;

    match cli.command {
        Commands::Preview(args) => preview::handle(&ctx, args).await?,
        Commands::Action(args) => action::handle(&ctx, args).await?,
        Commands::Jams(cmd) => jams::handle(&ctx, cmd.action).await?,
    }

    Ok(())
}
