//! Subcommand implementations.

mod adjust_counter;
mod connect;
mod create;
mod delete;
mod get;
mod list;
mod status;
mod update;

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::Value;

use crate::cli::ConnectionArgs;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save the store to use for later commands
    Connect(connect::ConnectArgs),

    /// Display the active connection
    Status(status::StatusArgs),

    /// List records in a collection
    List(list::ListArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a record from JSON
    Create(create::CreateArgs),

    /// Apply a partial update from JSON
    Update(update::UpdateArgs),

    /// Delete a record and everything that depends on it
    Delete(delete::DeleteArgs),

    /// Add to a numeric counter field
    AdjustCounter(adjust_counter::AdjustCounterArgs),
}

pub async fn handle(command: Command, connection: ConnectionArgs) -> Result<()> {
    match command {
        Command::Connect(args) => connect::run(args, connection).await,
        Command::Status(args) => status::run(args, connection).await,
        Command::List(args) => list::run(args, connection).await,
        Command::Get(args) => get::run(args, connection).await,
        Command::Create(args) => create::run(args, connection).await,
        Command::Update(args) => update::run(args, connection).await,
        Command::Delete(args) => delete::run(args, connection).await,
        Command::AdjustCounter(args) => adjust_counter::run(args, connection).await,
    }
}

/// Read a JSON value from a file, or from stdin for `-`.
fn read_json(source: &str) -> Result<Value> {
    if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        serde_json::from_str(&buf).context("Invalid JSON from stdin")
    } else {
        let content = std::fs::read_to_string(source).context("Failed to read JSON file")?;
        serde_json::from_str(&content).context("Invalid JSON in file")
    }
}
