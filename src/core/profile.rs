//! Profile store.
//!
//! Named credentials (endpoint + token) persisted as a single TOML document
//! at `~/.vault/credentials`. Every read re-parses the file; writes replace
//! the whole document, so concurrent writers race and the last one wins.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::constants;
use crate::error::{Result, StoreError};

/// A stored credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub endpoint_url: String,
    pub token: String,
}

impl Profile {
    pub fn new(endpoint_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("endpoint_url", &self.endpoint_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// File-backed mapping from profile name to [`Profile`].
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    /// Store at the default per-user location (`~/.vault/credentials`).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if the home directory is unknown.
    pub fn open_default() -> Result<Self> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::at(
            home.join(constants::STORE_DIR)
                .join(constants::CREDENTIALS_FILE),
        ))
    }

    /// Store backed by an arbitrary file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the store directory and file if missing.
    ///
    /// Safe to call repeatedly. Existing entries with permissions broader
    /// than owner-only are tightened; if that fails a warning is logged and
    /// the call still succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the directory or file cannot be
    /// created.
    pub fn ensure_initialized(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                debug!(path = %dir.display(), "creating profile store directory");
                fs::create_dir_all(dir).map_err(StoreError::WriteFailed)?;
            }
            restrict_permissions(dir, constants::STORE_DIR_MODE);
        }

        if !self.path.exists() {
            debug!(path = %self.path.display(), "creating profile store");
            fs::write(&self.path, "").map_err(StoreError::WriteFailed)?;
        }
        restrict_permissions(&self.path, constants::SECRET_FILE_MODE);

        Ok(())
    }

    /// Look up a profile. Absence is `Ok(None)`.
    pub fn get(&self, name: &str) -> Result<Option<Profile>> {
        Ok(self.list()?.remove(name))
    }

    /// Insert or replace a profile.
    pub fn set(&self, name: &str, profile: Profile) -> Result<()> {
        let mut profiles = self.list()?;
        profiles.insert(name.to_string(), profile);
        self.write(&profiles)
    }

    /// Remove a profile. Removing an absent name is a no-op.
    pub fn delete(&self, name: &str) -> Result<()> {
        let mut profiles = self.list()?;
        if profiles.remove(name).is_some() {
            self.write(&profiles)?;
        }
        Ok(())
    }

    /// Every stored profile.
    pub fn list(&self) -> Result<BTreeMap<String, Profile>> {
        self.ensure_initialized()?;

        let contents = fs::read_to_string(&self.path).map_err(StoreError::ReadFailed)?;
        let profiles: BTreeMap<String, Profile> =
            toml::from_str(&contents).map_err(StoreError::Parse)?;

        debug!(count = profiles.len(), "profile store loaded");
        Ok(profiles)
    }

    fn write(&self, profiles: &BTreeMap<String, Profile>) -> Result<()> {
        let contents = toml::to_string_pretty(profiles).map_err(StoreError::Serialize)?;
        fs::write(&self.path, contents).map_err(StoreError::WriteFailed)?;
        restrict_permissions(&self.path, constants::SECRET_FILE_MODE);
        debug!(count = profiles.len(), "profile store saved");
        Ok(())
    }
}

/// Best-effort tightening of a file or directory mode.
///
/// Failures are logged, never returned.
#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;

    let actual = match fs::metadata(path) {
        Ok(metadata) => metadata.permissions().mode() & 0o777,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot inspect permissions");
            return;
        }
    };

    if actual & !mode == 0 {
        return;
    }

    if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        warn!(
            path = %path.display(),
            mode = %format!("{:o}", actual),
            error = %e,
            "insecure permissions on profile store"
        );
    } else {
        debug!(path = %path.display(), "tightened permissions");
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) {}
