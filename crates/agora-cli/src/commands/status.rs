//! Status command implementation.

use anyhow::Result;
use clap::Args;

use agora_core::Store;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;

#[derive(Args, Debug)]
pub struct StatusArgs {}

pub async fn run(_args: StatusArgs, connection: ConnectionArgs) -> Result<()> {
    let connection = Connection::resolve(&connection)?;
    let store = connection.open()?;

    output::field("Store", store.url().as_str());
    output::field("Backend", store.kind());
    output::field(
        "Token",
        if connection.token.is_some() { "set" } else { "none" },
    );
    output::field(
        "Filtered batch cap",
        &connection.facade.filtered_batch_cap.to_string(),
    );
    output::field(
        "Default page size",
        &connection.facade.default_page_size.to_string(),
    );

    Ok(())
}
