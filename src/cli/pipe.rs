//! Pipe command.
//!
//! Runs a shell command with the secrets of a path added to its
//! environment and exits with the child's status.

use clap::Args;
use tokio::process::Command;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::credentials::CredentialOptions;
use crate::core::path::SecretPath;
use crate::core::session::Session;
use crate::error::{Error, Result, ValidationError};

#[derive(Args, Debug)]
pub struct PipeArgs {
    /// Secrets path, e.g. secret/app
    pub secrets_path: String,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Command to run; joined with spaces and passed to the shell
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

pub struct Pipe {
    path: SecretPath,
    command: String,
}

impl Schema for PipeArgs {
    type Valid = Pipe;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<Pipe> {
        let path = SecretPath::parse(&self.secrets_path)?;
        let command = self.command.join(" ");
        if command.trim().is_empty() {
            return Err(ValidationError::EmptyCommand.into());
        }
        Ok(Pipe { path, command })
    }
}

pub const PIPE: Descriptor<Pipe> = Descriptor {
    name: "pipe",
    body: Body::Remote(Gate::Unsealed, pipe),
};

fn pipe(args: Pipe, ctx: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let secrets = session
            .read_secret(&args.path)
            .await?
            .ok_or_else(|| Error::NotFound(args.path.to_string()))?;
        drop(session);

        output::info(&format!(
            "Loaded {} secrets from {}",
            secrets.len(),
            output::path(&args.path)
        ));

        let cwd = ctx.cwd()?;
        let mut child = shell_command(&args.command);
        child.current_dir(&cwd);
        for (key, value) in secrets {
            let value = Zeroizing::new(value);
            child.env(key, value.as_str());
        }

        debug!(cwd = %cwd.display(), "spawning child");
        let status = child.status().await?;
        let code = status.code().unwrap_or(1);
        debug!(code, "child exited");

        Ok(Outcome::Exited(code))
    })
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
