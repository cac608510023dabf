//! Credential resolution.
//!
//! Decides which endpoint and token a command authenticates with: a named
//! profile from the [`ProfileStore`], or an explicit endpoint/token pair.

use tracing::debug;

use crate::core::profile::{Profile, ProfileStore};
use crate::error::{Error, Result};

/// Credential-related options as supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialOptions {
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
    pub token: Option<String>,
}

/// Endpoint and token used to build a backend session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub endpoint_url: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint_url", &self.endpoint_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl From<Profile> for Credentials {
    fn from(profile: Profile) -> Self {
        Self {
            endpoint_url: profile.endpoint_url,
            token: profile.token,
        }
    }
}

/// Resolve credentials from command-line options.
///
/// A non-empty profile name always wins and is looked up in `store`; it
/// never falls back to an endpoint/token pair supplied alongside it.
///
/// # Errors
///
/// - `Error::ProfileNotFound` if the named profile is not stored
/// - `Error::MissingCredentials` if neither a profile nor both endpoint and
///   token were supplied
pub fn resolve(options: &CredentialOptions, store: &ProfileStore) -> Result<Credentials> {
    if let Some(name) = options.profile.as_deref().filter(|n| !n.is_empty()) {
        debug!(profile = name, "resolving credentials from profile");
        return store
            .get(name)?
            .map(Credentials::from)
            .ok_or_else(|| Error::ProfileNotFound(name.to_string()));
    }

    match (&options.endpoint_url, &options.token) {
        (Some(endpoint_url), Some(token)) => {
            debug!(endpoint = %endpoint_url, "using explicit credentials");
            Ok(Credentials {
                endpoint_url: endpoint_url.clone(),
                token: token.clone(),
            })
        }
        _ => Err(Error::MissingCredentials),
    }
}
