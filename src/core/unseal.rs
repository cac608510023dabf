//! Threshold unseal.
//!
//! Submits key shares one at a time until the backend reports it is
//! unsealed. The backend keeps partial progress; this side only decides
//! when to stop sending shares.
//!
//! ```text
//! Pending ──status──▶ Sealed{t, 0} ──share──▶ Unsealing{t, n} ──share──▶ ... ──▶ Unsealed
//!                          │                       │
//!                          └── error / shares exhausted while sealed ──▶ Failed
//! ```

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::core::backend::Backend;
use crate::error::{Error, Result};

/// Where the key shares came from.
#[derive(Clone)]
pub enum ShareSource {
    /// Discrete command-line arguments.
    Arguments(Vec<String>),
    /// Raw text read from a stream such as stdin.
    Stream(String),
}

impl ShareSource {
    /// Discrete, non-empty share tokens in submission order.
    ///
    /// Streamed input loses a single trailing line terminator, has every
    /// whitespace run collapsed to one space and is split on spaces.
    pub fn into_shares(self) -> Vec<Zeroizing<String>> {
        match self {
            ShareSource::Arguments(args) => args
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(Zeroizing::new)
                .collect(),
            ShareSource::Stream(raw) => {
                let raw = Zeroizing::new(raw);
                let trimmed = raw
                    .strip_suffix("\r\n")
                    .or_else(|| raw.strip_suffix('\n'))
                    .or_else(|| raw.strip_suffix('\r'))
                    .unwrap_or(raw.as_str());
                trimmed
                    .split_whitespace()
                    .map(|s| Zeroizing::new(s.to_string()))
                    .collect()
            }
        }
    }
}

/// Machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsealState {
    /// No seal status fetched yet.
    Pending,
    Sealed { threshold: u32, submitted: usize },
    Unsealing { threshold: u32, submitted: usize },
    Unsealed,
    Failed(String),
}

/// Progress after one submitted share.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsealProgress {
    pub submitted: usize,
    pub threshold: u32,
}

/// Successful result of [`unseal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsealOutcome {
    /// The backend was not sealed; nothing was submitted.
    AlreadyUnsealed,
    /// The backend unsealed after `submitted` shares.
    Unsealed { submitted: usize },
}

/// Drives one unseal attempt against a backend.
pub struct Unsealer<'a> {
    backend: &'a dyn Backend,
    state: UnsealState,
}

impl<'a> Unsealer<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self {
            backend,
            state: UnsealState::Pending,
        }
    }

    pub fn state(&self) -> &UnsealState {
        &self.state
    }

    /// Run the attempt to a terminal state.
    ///
    /// `on_progress` is called after every accepted submission.
    ///
    /// # Errors
    ///
    /// - `Error::InsufficientShares` if fewer shares than the threshold were
    ///   supplied; nothing is submitted in that case
    /// - `Error::UnsealIncomplete` if the backend is still sealed after the
    ///   last submission
    /// - any backend error, which aborts the remaining submissions
    pub async fn run(
        &mut self,
        source: ShareSource,
        mut on_progress: impl FnMut(UnsealProgress),
    ) -> Result<UnsealOutcome> {
        let status = self.backend.seal_status().await?;
        if !status.sealed {
            info!("backend already unsealed");
            self.state = UnsealState::Unsealed;
            return Ok(UnsealOutcome::AlreadyUnsealed);
        }

        let mut threshold = status.threshold;
        self.state = UnsealState::Sealed {
            threshold,
            submitted: 0,
        };

        let shares = source.into_shares();
        if shares.len() < threshold as usize {
            let err = Error::InsufficientShares {
                provided: shares.len(),
                threshold,
            };
            self.state = UnsealState::Failed(err.to_string());
            return Err(err);
        }

        let mut last = status;
        let mut submitted = 0;
        for share in &shares {
            last = match self.backend.submit_unseal_share(share).await {
                Ok(status) => status,
                Err(e) => {
                    self.state = UnsealState::Failed(e.to_string());
                    return Err(e);
                }
            };
            submitted += 1;
            if last.threshold > 0 {
                threshold = last.threshold;
            }

            debug!(
                submitted,
                threshold,
                progress = last.progress,
                sealed = last.sealed,
                "unseal share submitted"
            );
            self.state = UnsealState::Unsealing {
                threshold,
                submitted,
            };
            on_progress(UnsealProgress {
                submitted,
                threshold,
            });

            if !last.sealed || last.progress == 0 {
                break;
            }
        }

        if last.sealed {
            let err = Error::UnsealIncomplete {
                progress: last.progress,
                threshold,
            };
            self.state = UnsealState::Failed(err.to_string());
            return Err(err);
        }

        self.state = UnsealState::Unsealed;
        Ok(UnsealOutcome::Unsealed { submitted })
    }
}

/// Unseal `backend` with the shares from `source`.
///
/// Convenience wrapper around [`Unsealer::run`].
pub async fn unseal(
    backend: &dyn Backend,
    source: ShareSource,
    on_progress: impl FnMut(UnsealProgress),
) -> Result<UnsealOutcome> {
    Unsealer::new(backend).run(source, on_progress).await
}
