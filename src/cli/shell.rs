//! Command execution shell.
//!
//! Every command is a static [`Descriptor`]: a name plus a [`Body`] that
//! says whether the command talks to the backend and, if it does, which
//! seal state it needs. [`dispatch`] runs the same pipeline for all of them:
//!
//! ```text
//! raw args ──validate──▶ valid args ──(Remote: establish session)──▶ body ──▶ Outcome
//! ```
//!
//! Validation is pure and runs before any file or network access.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::core::backend::{Connector, HttpConnector};
use crate::core::credentials::CredentialOptions;
use crate::core::profile::ProfileStore;
use crate::core::session::{self, Requirement, Session};
use crate::error::{Error, Result};

/// Boxed future returned by command bodies.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The user declined an optional step, or there was nothing to do.
    Aborted,
    /// The user declined a step the command cannot finish without.
    Refused,
    /// A child process exited with this code.
    Exited(i32),
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Completed | Outcome::Aborted => 0,
            Outcome::Refused => 1,
            Outcome::Exited(code) => code,
        }
    }
}

/// Seal state a remote command needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Any,
    Unsealed,
}

impl From<Gate> for Requirement {
    fn from(gate: Gate) -> Self {
        match gate {
            Gate::Any => Requirement::Any,
            Gate::Unsealed => Requirement::Unsealed,
        }
    }
}

pub type LocalFn<V> = fn(V, &Context) -> BoxFuture<'_, Result<Outcome>>;
pub type RemoteFn<V> = fn(V, &Context, Session) -> BoxFuture<'_, Result<Outcome>>;

pub enum Body<V> {
    /// Runs without credentials or a backend.
    Local(LocalFn<V>),
    /// Runs against a backend in the given seal state.
    Remote(Gate, RemoteFn<V>),
}

pub struct Descriptor<V> {
    pub name: &'static str,
    pub body: Body<V>,
}

/// Raw command arguments.
pub trait Schema {
    type Valid: Send;

    /// Credential options for remote commands.
    fn credentials(&self) -> CredentialOptions {
        CredentialOptions::default()
    }

    /// Check and normalize the arguments. Must not touch the file system
    /// or the network.
    fn validate(self) -> Result<Self::Valid>;
}

/// Per-invocation state passed to every command.
#[derive(Clone)]
pub struct Context {
    /// `--cwd` as given; resolved against the process directory on use.
    pub workdir: Option<PathBuf>,
    pub store: ProfileStore,
    pub connector: Arc<dyn Connector>,
}

impl Context {
    /// Context for a normal run: the default profile store and HTTP
    /// backends. `workdir` is not checked until a command asks for it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoHomeDir` if the home directory is unknown.
    pub fn new(workdir: Option<PathBuf>) -> Result<Self> {
        Ok(Self {
            workdir,
            store: ProfileStore::open_default()?,
            connector: Arc::new(HttpConnector),
        })
    }

    pub fn with_parts(
        workdir: Option<PathBuf>,
        store: ProfileStore,
        connector: Arc<dyn Connector>,
    ) -> Self {
        Self {
            workdir,
            store,
            connector,
        }
    }

    /// Working directory: the process directory, or `--cwd` resolved
    /// against it.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the directory does not exist.
    pub fn cwd(&self) -> Result<PathBuf> {
        let current = std::env::current_dir()?;
        let cwd = match &self.workdir {
            Some(dir) => current.join(dir),
            None => current,
        };
        if !cwd.is_dir() {
            return Err(Error::NotFound(cwd.display().to_string()));
        }
        Ok(cwd)
    }

    /// Resolve `path` against the working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.cwd()?.join(path))
    }
}

/// Validate `args` and run `descriptor` with them.
///
/// # Errors
///
/// Validation errors, session errors (`MissingCredentials`, `Sealed`, ...)
/// and whatever the command body returns.
pub async fn dispatch<S: Schema>(
    descriptor: &Descriptor<S::Valid>,
    args: S,
    ctx: &Context,
) -> Result<Outcome> {
    let credentials = args.credentials();
    let valid = args.validate()?;
    let cwd = ctx.cwd()?;
    debug!(cwd = %cwd.display(), "working directory");

    match descriptor.body {
        Body::Local(run) => {
            debug!(command = descriptor.name, "running local command");
            run(valid, ctx).await
        }
        Body::Remote(gate, run) => {
            debug!(command = descriptor.name, gate = ?gate, "running remote command");
            let session = session::establish(
                &credentials,
                gate.into(),
                &ctx.store,
                ctx.connector.as_ref(),
            )
            .await?
            .ok_or(Error::MissingCredentials)?;
            run(valid, ctx, session).await
        }
    }
}
