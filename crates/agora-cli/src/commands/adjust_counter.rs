//! Adjust counter command implementation.

use anyhow::{Context, Result};
use clap::Args;

use agora_core::{Collection, RecordId};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct AdjustCounterArgs {
    /// Collection name
    pub collection: Collection,

    /// Record id
    pub id: RecordId,

    /// Counter field (e.g. responseCount)
    pub field: String,

    /// Amount to add; negative to subtract
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,
}

pub async fn run(args: AdjustCounterArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    facade
        .adjust_counter(args.collection, &args.id, &args.field, args.delta)
        .await
        .with_context(|| format!("Failed to adjust {} on {}/{}", args.field, args.collection, args.id))?;

    output::success(&format!(
        "Adjusted {} on {}/{} by {}",
        args.field, args.collection, args.id, args.delta
    ));

    Ok(())
}
