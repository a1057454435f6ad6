//! Profile storage for persisting the store connection.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use agora_core::FacadeConfig;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored connection profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub store: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facade: Option<FacadeConfig>,
}

/// Get the profile file path.
pub fn profile_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "agora").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("profile.json"))
}

/// Save a profile to disk, readable only by the owner.
pub fn save_profile(profile: &StoredProfile) -> Result<PathBuf> {
    let path = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;

    fs::write(&path, &json).context("Failed to write profile file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(path)
}

/// Load the saved profile, if any.
pub fn load_profile() -> Result<Option<StoredProfile>> {
    let path = profile_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read profile file")?;
    let profile = serde_json::from_str(&json).context("Invalid profile file")?;
    Ok(Some(profile))
}
