//! Session establishment.
//!
//! Turns credential options into an authenticated backend handle, checking
//! the seal state first when the caller needs an unsealed backend.

use tracing::debug;

use crate::core::backend::{Backend, Connector};
use crate::core::credentials::{self, CredentialOptions};
use crate::core::profile::ProfileStore;
use crate::error::{Error, Result};

/// How much of a session a command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requirement {
    /// No credentials, no backend.
    None,
    /// A backend handle in whatever seal state it is.
    Any,
    /// A backend handle that reported itself unsealed.
    #[default]
    Unsealed,
}

/// An authenticated backend handle.
pub struct Session {
    backend: Box<dyn Backend>,
}

impl Session {
    pub fn new(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }
}

impl std::ops::Deref for Session {
    type Target = dyn Backend;

    fn deref(&self) -> &Self::Target {
        self.backend.as_ref()
    }
}

/// Establish a session for `requirement`.
///
/// Makes no network call for `None` and `Any`, and exactly one seal-status
/// round trip for `Unsealed`.
///
/// # Errors
///
/// - credential resolution errors (`ProfileNotFound`, `MissingCredentials`)
/// - `Error::Sealed` if `Unsealed` was required and the backend is sealed
/// - backend errors from the seal-status query
pub async fn establish(
    options: &CredentialOptions,
    requirement: Requirement,
    store: &ProfileStore,
    connector: &dyn Connector,
) -> Result<Option<Session>> {
    if requirement == Requirement::None {
        return Ok(None);
    }

    let credentials = credentials::resolve(options, store)?;
    let session = Session::new(connector.connect(&credentials)?);

    if requirement == Requirement::Unsealed {
        let status = session.seal_status().await?;
        debug!(
            sealed = status.sealed,
            threshold = status.threshold,
            "checked seal status"
        );
        if status.sealed {
            return Err(Error::Sealed);
        }
    }

    Ok(Some(session))
}
