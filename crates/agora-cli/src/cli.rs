//! CLI argument definitions.

use clap::{Args, Parser};

use crate::commands::Command;

/// Inspect and edit an agora forum store.
#[derive(Parser, Debug)]
#[command(name = "agora")]
#[command(author, version = env!("AGORA_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Store connection overrides. Anything unset falls back to the saved profile.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Store URL (https://, http://localhost or file://)
    #[arg(long, env = "AGORA_STORE", global = true)]
    pub store: Option<String>,

    /// Bearer token presented to the store
    #[arg(long, env = "AGORA_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,
}
