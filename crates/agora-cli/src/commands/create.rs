//! Create command implementation.

use anyhow::{Context, Result};
use clap::Args;

use agora_core::{AnyDocument, Collection};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub collection: Collection,

    /// JSON file with the record's fields (use - for stdin)
    #[arg(long)]
    pub json: String,
}

pub async fn run(args: CreateArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    let value = super::read_json(&args.json)?;
    let document =
        AnyDocument::from_json(args.collection, value).context("Record does not match schema")?;

    let id = facade
        .create_any(&document)
        .await
        .context("Failed to create record")?;

    println!("{}", id);
    output::success(&format!("Created {}/{}", args.collection, id));

    Ok(())
}
