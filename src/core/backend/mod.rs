//! Secret backend client.
//!
//! Abstracts the operations kvault performs against a Vault-compatible
//! server so the session and unseal logic can run against any
//! implementation.
//!
//! ## Implementations
//!
//! - [`HttpBackend`]: the Vault HTTP API over `reqwest`
//! - `MockBackend` (tests only): scripted seal statuses and call recording

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::credentials::Credentials;
use crate::core::path::SecretPath;
use crate::error::Result;

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{parse_endpoint, HttpBackend};

/// Key/value pairs stored at a secret path.
pub type SecretData = BTreeMap<String, String>;

/// Seal state as reported by the backend at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SealStatus {
    pub sealed: bool,
    /// Shares required to unseal.
    #[serde(rename = "t", default)]
    pub threshold: u32,
    /// Shares accepted so far in the current attempt.
    #[serde(default)]
    pub progress: u32,
    /// Total shares issued.
    #[serde(rename = "n", default)]
    pub shares: u32,
}

/// Operations the CLI needs from the secret backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the latest version of a secret. `None` when nothing is stored.
    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretData>>;

    /// Write a new version of a secret.
    async fn write_secret(&self, path: &SecretPath, data: &SecretData) -> Result<()>;

    /// Soft-delete specific versions of a secret.
    async fn delete_secret_versions(&self, path: &SecretPath, versions: &[u64]) -> Result<()>;

    /// Delete a secret with all its versions and metadata.
    async fn delete_secret_metadata(&self, path: &SecretPath) -> Result<()>;

    /// Mount a secret engine of `engine_type` at `mount`.
    async fn mount_engine(&self, mount: &str, engine_type: &str) -> Result<()>;

    /// Unmount the engine at `mount`.
    async fn unmount_engine(&self, mount: &str) -> Result<()>;

    /// Whether an engine is mounted at `mount`.
    async fn engine_exists(&self, mount: &str) -> Result<bool>;

    async fn seal_status(&self) -> Result<SealStatus>;

    async fn seal(&self) -> Result<()>;

    /// Submit one unseal key share and return the resulting status.
    async fn submit_unseal_share(&self, share: &str) -> Result<SealStatus>;
}

#[async_trait]
impl<T: Backend + ?Sized> Backend for Arc<T> {
    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretData>> {
        (**self).read_secret(path).await
    }

    async fn write_secret(&self, path: &SecretPath, data: &SecretData) -> Result<()> {
        (**self).write_secret(path, data).await
    }

    async fn delete_secret_versions(&self, path: &SecretPath, versions: &[u64]) -> Result<()> {
        (**self).delete_secret_versions(path, versions).await
    }

    async fn delete_secret_metadata(&self, path: &SecretPath) -> Result<()> {
        (**self).delete_secret_metadata(path).await
    }

    async fn mount_engine(&self, mount: &str, engine_type: &str) -> Result<()> {
        (**self).mount_engine(mount, engine_type).await
    }

    async fn unmount_engine(&self, mount: &str) -> Result<()> {
        (**self).unmount_engine(mount).await
    }

    async fn engine_exists(&self, mount: &str) -> Result<bool> {
        (**self).engine_exists(mount).await
    }

    async fn seal_status(&self) -> Result<SealStatus> {
        (**self).seal_status().await
    }

    async fn seal(&self) -> Result<()> {
        (**self).seal().await
    }

    async fn submit_unseal_share(&self, share: &str) -> Result<SealStatus> {
        (**self).submit_unseal_share(share).await
    }
}

/// Check whether anything is stored at `path`.
///
/// A plain existence probe: absence is `false`, not an error.
pub async fn secret_exists(backend: &dyn Backend, path: &SecretPath) -> Result<bool> {
    Ok(backend.read_secret(path).await?.is_some())
}

/// Builds backend handles from resolved credentials.
pub trait Connector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn Backend>>;
}

/// Connects over HTTP.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn Backend>> {
        Ok(Box::new(HttpBackend::new(credentials)?))
    }
}
