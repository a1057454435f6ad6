//! Get command implementation.

use anyhow::{Context, Result};
use clap::Args;

use agora_core::{Collection, RecordId};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Collection name
    pub collection: Collection,

    /// Record id
    pub id: RecordId,

    /// Print on a single line
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(args: GetArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    let doc = facade
        .get_raw(args.collection, &args.id)
        .await
        .with_context(|| format!("Failed to get {}/{}", args.collection, args.id))?;

    output::document(&doc, !args.compact)
}
