//! Secret path model.
//!
//! A secret reference such as `secret/app/prod` names a KV engine mount
//! (`secret`) and a path inside that engine (`app/prod`). Leading, trailing
//! and repeated slashes are ignored.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A parsed `<mount>/<path>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretPath {
    mount: String,
    sub_path: String,
}

impl SecretPath {
    /// Parse a human-provided reference.
    ///
    /// The input must contain a `/` and at least one non-empty segment. The
    /// first segment is the mount; the rest, rejoined with `/`, is the path
    /// inside the engine (empty means the engine root).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPath` for `""`, `"/"`, whitespace-only input, or
    /// a bare mount name without any slash.
    pub fn parse(input: &str) -> Result<Self> {
        if !input.contains('/') {
            return Err(Error::InvalidPath(input.to_string()));
        }

        let mut segments = input.split('/').filter(|s| !s.trim().is_empty());

        let mount = segments
            .next()
            .ok_or_else(|| Error::InvalidPath(input.to_string()))?
            .to_string();
        let sub_path = segments.collect::<Vec<_>>().join("/");

        Ok(Self { mount, sub_path })
    }

    /// Engine mount name.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Path inside the engine; empty for the engine root.
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Whether this reference addresses the engine root.
    pub fn is_root(&self) -> bool {
        self.sub_path.is_empty()
    }
}

impl FromStr for SecretPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SecretPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sub_path.is_empty() {
            write!(f, "{}", self.mount)
        } else {
            write!(f, "{}/{}", self.mount, self.sub_path)
        }
    }
}
