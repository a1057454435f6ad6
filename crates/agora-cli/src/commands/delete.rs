//! Delete command implementation.

use anyhow::{Context, Result};
use clap::Args;

use agora_core::{Collection, RecordId};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection name
    pub collection: Collection,

    /// Record id
    pub id: RecordId,
}

pub async fn run(args: DeleteArgs, connection: ConnectionArgs) -> Result<()> {
    let facade = Connection::resolve(&connection)?.facade()?;

    let report = facade
        .delete(args.collection, &args.id)
        .await
        .with_context(|| format!("Failed to delete {}/{}", args.collection, args.id))?;

    if report.dependents_deleted > 0 {
        output::success(&format!(
            "Deleted {}/{} and {} dependent records",
            args.collection, args.id, report.dependents_deleted
        ));
    } else {
        output::success(&format!("Deleted {}/{}", args.collection, args.id));
    }

    Ok(())
}
