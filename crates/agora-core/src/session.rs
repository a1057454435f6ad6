//! Signed-in identity, passed explicitly to whatever needs it.
//!
//! The auth provider owns credentials and tokens. It reports who is signed
//! in through a [`SessionContext`], which callers hand to the components
//! that need an identity instead of reading a process-wide global.

use tokio::sync::watch;
use tracing::info;

use crate::schema::{Role, UserProfile};
use crate::types::RecordId;

/// The caller identity supplied by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: RecordId,
    pub display_name: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn new(uid: RecordId) -> Self {
        Self {
            uid,
            display_name: None,
            role: Role::User,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins count as moderators.
    pub fn is_moderator(&self) -> bool {
        matches!(self.role, Role::Moderator | Role::Admin)
    }
}

impl From<&UserProfile> for Identity {
    fn from(profile: &UserProfile) -> Self {
        Self {
            uid: profile.uid.clone(),
            display_name: Some(profile.name.clone()),
            role: profile.role,
        }
    }
}

/// Current sign-in state with change notification.
///
/// Cloning shares the same state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    tx: watch::Sender<Option<Identity>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionContext {
    /// A context with nobody signed in.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Record a sign-in (or a refreshed profile) and notify subscribers.
    pub fn sign_in(&self, identity: Identity) {
        info!(uid = %identity.uid, role = %identity.role, "Signed in");
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        info!("Signed out");
        self.tx.send_replace(None);
    }

    /// Returns the current identity, if signed in.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Subscribe to sign-in state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
