//! In-memory backend for unit tests.
//!
//! Simulates threshold unsealing: each accepted share bumps progress and the
//! backend unseals (resetting progress to 0) once the threshold is reached.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Backend, Connector, SealStatus, SecretData};
use crate::core::credentials::Credentials;
use crate::core::path::SecretPath;
use crate::error::{BackendError, Result};

#[derive(Default)]
struct State {
    status: Option<SealStatus>,
    secrets: BTreeMap<String, SecretData>,
    engines: BTreeSet<String>,
    rejected_shares: HashSet<String>,
    resetting_shares: HashSet<String>,
    submitted: Vec<String>,
    deleted_versions: Vec<(String, Vec<u64>)>,
    seal_status_calls: usize,
    calls: Vec<&'static str>,
}

pub(crate) struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    pub(crate) fn sealed(threshold: u32) -> Self {
        Self::with_status(SealStatus {
            sealed: true,
            threshold,
            progress: 0,
            shares: threshold.max(1) + 2,
        })
    }

    pub(crate) fn unsealed() -> Self {
        Self::with_status(SealStatus {
            sealed: false,
            threshold: 1,
            progress: 0,
            shares: 1,
        })
    }

    fn with_status(status: SealStatus) -> Self {
        Self {
            state: Mutex::new(State {
                status: Some(status),
                ..Default::default()
            }),
        }
    }

    pub(crate) fn reject_share(&self, share: &str) {
        self.lock().rejected_shares.insert(share.to_string());
    }

    /// Accept `share` but reset progress to 0 without unsealing.
    pub(crate) fn reset_on_share(&self, share: &str) {
        self.lock().resetting_shares.insert(share.to_string());
    }

    pub(crate) fn insert_secret(&self, path: &str, pairs: &[(&str, &str)]) {
        let data = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.lock().secrets.insert(normalize(path), data);
    }

    pub(crate) fn add_engine(&self, mount: &str) {
        self.lock().engines.insert(mount.to_string());
    }

    pub(crate) fn submitted(&self) -> Vec<String> {
        self.lock().submitted.clone()
    }

    pub(crate) fn seal_status_calls(&self) -> usize {
        self.lock().seal_status_calls
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub(crate) fn secret(&self, path: &str) -> Option<SecretData> {
        self.lock().secrets.get(&normalize(path)).cloned()
    }

    pub(crate) fn deleted_versions(&self) -> Vec<(String, Vec<u64>)> {
        self.lock().deleted_versions.clone()
    }

    pub(crate) fn is_sealed(&self) -> bool {
        self.lock().status.map(|s| s.sealed).unwrap_or(true)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }
}

fn normalize(path: &str) -> String {
    SecretPath::parse(path).unwrap().to_string()
}

fn status(state: &State) -> SealStatus {
    state.status.unwrap()
}

#[async_trait]
impl Backend for MockBackend {
    async fn read_secret(&self, path: &SecretPath) -> Result<Option<SecretData>> {
        let mut state = self.lock();
        state.calls.push("read_secret");
        Ok(state.secrets.get(&path.to_string()).cloned())
    }

    async fn write_secret(&self, path: &SecretPath, data: &SecretData) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("write_secret");
        state.secrets.insert(path.to_string(), data.clone());
        Ok(())
    }

    async fn delete_secret_versions(&self, path: &SecretPath, versions: &[u64]) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("delete_secret_versions");
        state
            .deleted_versions
            .push((path.to_string(), versions.to_vec()));
        Ok(())
    }

    async fn delete_secret_metadata(&self, path: &SecretPath) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("delete_secret_metadata");
        state.secrets.remove(&path.to_string());
        Ok(())
    }

    async fn mount_engine(&self, mount: &str, _engine_type: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("mount_engine");
        state.engines.insert(mount.to_string());
        Ok(())
    }

    async fn unmount_engine(&self, mount: &str) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("unmount_engine");
        state.engines.remove(mount);
        Ok(())
    }

    async fn engine_exists(&self, mount: &str) -> Result<bool> {
        let mut state = self.lock();
        state.calls.push("engine_exists");
        Ok(state.engines.contains(mount))
    }

    async fn seal_status(&self) -> Result<SealStatus> {
        let mut state = self.lock();
        state.calls.push("seal_status");
        state.seal_status_calls += 1;
        Ok(status(&state))
    }

    async fn seal(&self) -> Result<()> {
        let mut state = self.lock();
        state.calls.push("seal");
        let mut current = status(&state);
        current.sealed = true;
        current.progress = 0;
        state.status = Some(current);
        Ok(())
    }

    async fn submit_unseal_share(&self, share: &str) -> Result<SealStatus> {
        let mut state = self.lock();
        state.calls.push("submit_unseal_share");
        state.submitted.push(share.to_string());

        if state.rejected_shares.contains(share) {
            return Err(BackendError::Api {
                status: 400,
                errors: vec!["invalid key".to_string()],
            }
            .into());
        }

        let mut current = status(&state);
        if state.resetting_shares.contains(share) {
            current.progress = 0;
        } else if current.sealed {
            current.progress += 1;
            if current.progress >= current.threshold {
                current.sealed = false;
                current.progress = 0;
            }
        }
        state.status = Some(current);
        Ok(current)
    }
}

/// Connector handing out one shared [`MockBackend`].
pub(crate) struct MockConnector(pub(crate) Arc<MockBackend>);

impl Connector for MockConnector {
    fn connect(&self, _credentials: &Credentials) -> Result<Box<dyn Backend>> {
        Ok(Box::new(Arc::clone(&self.0)))
    }
}
