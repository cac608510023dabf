//! Confirmation prompts.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use tracing::debug;

use crate::error::Result;

/// Ask a yes/no question, defaulting to no.
///
/// Without a terminal on stdin nothing is shown and the answer is no.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        debug!(prompt, "stdin is not a terminal, declining");
        return Ok(false);
    }

    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(Into::into)
}
