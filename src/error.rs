//! Error types.
//!
//! Every fallible operation in kvault returns [`Result`]. Failures propagate
//! unchanged to the single boundary in `main`, which prints them and sets the
//! exit status.

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed secret reference.
    #[error("invalid secret path '{0}': expected <mount>/<path>")]
    InvalidPath(String),

    /// A `--profile` was given but is not in the profile store.
    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    /// Neither a profile nor an endpoint and token pair was supplied.
    #[error("no credentials: provide a profile or an endpoint url and token")]
    MissingCredentials,

    /// The backend is sealed and the command needs it unsealed.
    #[error("vault is sealed, unseal it and try again")]
    Sealed,

    /// Fewer unseal shares than the reported threshold.
    #[error("not enough unseal keys: {provided} provided, {threshold} required")]
    InsufficientShares { provided: usize, threshold: u32 },

    /// Shares ran out (or progress was reset) while the backend stayed sealed.
    #[error("vault is still sealed (progress {progress}/{threshold})")]
    UnsealIncomplete { progress: u32, threshold: u32 },

    /// A secret path, engine or local path does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    /// A secret engine is already mounted at the requested path.
    #[error("a secret engine already exists at {0}")]
    EngineExists(String),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Failures reported by, or while talking to, the secret backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("{} (status {status})", .errors.join("; "))]
    Api { status: u16, errors: Vec<String> },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Profile store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unable to determine home directory")]
    NoHomeDir,

    #[error("failed to read profile store: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("failed to write profile store: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("failed to parse profile store: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize profile store: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Rejected command-line input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("invalid version number: {0}")]
    InvalidVersion(String),

    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no command specified")]
    EmptyCommand,

    #[error("unsupported format '{0}'")]
    UnknownEnvFormat(String),
}

pub type Result<T> = std::result::Result<T, Error>;
