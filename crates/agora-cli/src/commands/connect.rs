//! Connect command implementation.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use agora_core::Store;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::profile::Connection;
use crate::profile::storage::{self, StoredProfile};

#[derive(Args, Debug)]
pub struct ConnectArgs {}

pub async fn run(_args: ConnectArgs, connection: ConnectionArgs) -> Result<()> {
    let url = connection
        .store
        .clone()
        .context("--store is required (or set AGORA_STORE)")?;

    let resolved = Connection::resolve(&connection)?;
    let store = resolved.open()?;

    // Keep any facade tuning from an earlier, readable profile.
    let facade = match storage::load_profile() {
        Ok(saved) => saved.and_then(|p| p.facade),
        Err(_) => None,
    };

    let path = storage::save_profile(&StoredProfile {
        store: url,
        token: connection.token,
        facade,
    })
    .context("Failed to save profile")?;
    info!(path = %path.display(), "Saved profile");

    output::success("Connected");
    output::field("Store", store.url().as_str());
    output::field("Backend", store.kind());
    output::field("Profile", &path.display().to_string());

    Ok(())
}
