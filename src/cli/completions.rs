//! Completions command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and PowerShell.

use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, Shell as CompletionShell};

use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Outcome, Schema};
use crate::cli::Cli;
use crate::error::Result;

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl Schema for CompletionsArgs {
    type Valid = Shell;

    fn validate(self) -> Result<Shell> {
        Ok(self.shell)
    }
}

pub const COMPLETIONS: Descriptor<Shell> = Descriptor {
    name: "completions",
    body: Body::Local(completions),
};

fn completions(shell: Shell, _: &Context) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        print!("{}", String::from_utf8_lossy(&buf));
        Ok(Outcome::Completed)
    })
}

/// Write the completion script for `shell` into `out`.
pub fn write_completions(shell: Shell, out: &mut dyn std::io::Write) {
    let mut cmd = Cli::command();
    generate(CompletionShell::from(shell), &mut cmd, "kvault", out);
}
