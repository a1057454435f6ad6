//! Update command implementation.

use anyhow::{Context, Result};
use clap::Args;

use agora_core::{AnyPatch, Collection, RecordId};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Collection name
    pub collection: Collection,

    /// Record id
    pub id: RecordId,

    /// JSON file with the fields to change (use - for stdin)
    #[arg(long)]
    pub json: String,
}

pub async fn run(args: UpdateArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    let value = super::read_json(&args.json)?;
    let patch = AnyPatch::from_json(args.collection, value).context("Invalid update")?;

    facade
        .update_any(&args.id, &patch)
        .await
        .with_context(|| format!("Failed to update {}/{}", args.collection, args.id))?;

    output::success(&format!("Updated {}/{}", args.collection, args.id));

    Ok(())
}
