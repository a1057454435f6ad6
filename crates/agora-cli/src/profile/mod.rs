//! Connection profile and the store it opens.

pub mod storage;
mod types;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use agora_core::{AccessToken, FacadeConfig, QueryFacade, StoreUrl};
use agora_file::FileStore;
use agora_rest::RestStore;

use crate::cli::ConnectionArgs;

pub use types::CliStore;

/// A fully resolved connection: flags and environment over the saved profile.
#[derive(Debug, Clone)]
pub struct Connection {
    pub store: StoreUrl,
    pub token: Option<AccessToken>,
    pub facade: FacadeConfig,
}

impl Connection {
    /// Resolve from overrides, falling back to the saved profile.
    ///
    /// An unreadable profile is skipped when `--store` is given, so that
    /// `agora connect` can replace it.
    pub fn resolve(args: &ConnectionArgs) -> Result<Self> {
        let saved = match storage::load_profile() {
            Ok(saved) => saved,
            Err(e) if args.store.is_some() => {
                let reason = format!("{:#}", e);
                warn!(error = %reason, "Ignoring unreadable profile");
                None
            }
            Err(e) => return Err(e.context("Failed to load profile")),
        };

        let store = match (&args.store, &saved) {
            (Some(url), _) => url.clone(),
            (None, Some(profile)) => profile.store.clone(),
            (None, None) => anyhow::bail!(
                "No store configured. Run 'agora connect --store URL' or set AGORA_STORE."
            ),
        };
        let store = StoreUrl::new(&store).context("Invalid store URL")?;

        let token = args
            .token
            .clone()
            .or_else(|| saved.as_ref().and_then(|p| p.token.clone()))
            .map(AccessToken::new);
        let facade = saved.and_then(|p| p.facade).unwrap_or_default();

        debug!(%store, token = token.is_some(), "Resolved connection");
        Ok(Self {
            store,
            token,
            facade,
        })
    }

    /// Open the store this connection points at.
    pub fn open(&self) -> Result<CliStore> {
        if self.store.is_local() {
            let store = FileStore::from_url(self.store.clone())
                .context("Failed to open file store")?;
            Ok(CliStore::File(store))
        } else {
            let store = RestStore::new(self.store.clone(), self.token.as_ref())
                .context("Failed to create store client")?;
            Ok(CliStore::Rest(store))
        }
    }

    pub fn facade(&self) -> Result<QueryFacade<CliStore>> {
        Ok(QueryFacade::with_config(self.open()?, self.facade))
    }
}
