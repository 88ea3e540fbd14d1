//! Command-line surface for `jamdesk-cli`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jamdesk::config::ClientOverrides;

use crate::io::parse_param;

#[derive(Parser, Debug)]
#[command(name = "jamdesk-cli", version, about = "Jam editor preview and staff action client", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: ClientOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render editor contents through the site's render endpoint
    Preview(PreviewArgs),
    /// Send an arbitrary action to the action endpoint
    Action(ActionArgs),
    /// Staff jam management actions
    Jams(JamsArgs),
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Jam title; an empty title skips rendering
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub body: Option<String>,
    #[arg(long)]
    pub body_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ActionArgs {
    /// Action name sent as the `action` query parameter
    pub name: String,
    /// HTTP method (GET, POST, DELETE, ...)
    #[arg(long, default_value = "POST")]
    pub method: String,
    /// Extra query parameter, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

#[derive(Parser, Debug)]
pub struct JamsArgs {
    #[command(subcommand)]
    pub action: JamsCmd,
}

#[derive(Subcommand, Debug)]
pub enum JamsCmd {
    /// Move a jam to a new state
    SetState {
        #[arg(long)]
        jam: String,
        #[arg(long)]
        state: String,
    },
    /// List form questions
    Questions,
    /// Attach a question to a jam form
    AssociateQuestion {
        #[arg(long)]
        form: u64,
        #[arg(long)]
        question: String,
    },
    /// Detach a question from a jam form
    DisassociateQuestion {
        #[arg(long)]
        form: u64,
        #[arg(long)]
        question: String,
    },
    /// Record an infraction against a participant
    Infraction {
        #[arg(long)]
        participant: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        number: i64,
    },
    /// Delete a question
    DeleteQuestion { id: String },
    /// Delete an infraction
    DeleteInfraction { id: String },
}
