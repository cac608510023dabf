//! Push command.
//!
//! Uploads a dotenv or JSON file as a new version of a secrets path.

use std::path::PathBuf;

use clap::Args;
use tracing::{debug, info};

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::backend::secret_exists;
use crate::core::credentials::CredentialOptions;
use crate::core::env::Env;
use crate::core::path::SecretPath;
use crate::core::session::Session;
use crate::error::{Result, ValidationError};

#[derive(Args, Debug)]
pub struct PushArgs {
    /// Environment file to upload (dotenv or JSON)
    pub env_file: PathBuf,

    /// Secrets path, e.g. secret/app
    pub secrets_path: String,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Overwrite existing secrets without asking
    #[arg(short, long)]
    pub force: bool,
}

pub struct Push {
    env_file: PathBuf,
    path: SecretPath,
    force: bool,
}

impl Schema for PushArgs {
    type Valid = Push;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<Push> {
        if self.env_file.as_os_str().is_empty() {
            return Err(ValidationError::Empty { field: "env file" }.into());
        }

        Ok(Push {
            env_file: self.env_file,
            path: SecretPath::parse(&self.secrets_path)?,
            force: self.force,
        })
    }
}

pub const PUSH: Descriptor<Push> = Descriptor {
    name: "push",
    body: Body::Remote(Gate::Unsealed, push),
};

fn push(args: Push, ctx: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let env_path = ctx.resolve(&args.env_file)?;

        let env = if env_path.is_file() {
            Env::load(&env_path)?
        } else {
            debug!(path = %env_path.display(), "env file not found");
            Env::from_data(Default::default(), env_path.clone())
        };

        if env.is_empty() {
            output::warn(&format!(
                "No secrets found in {}. Nothing to push.",
                output::path(env_path.display())
            ));
            return Ok(Outcome::Aborted);
        }

        if !args.force && secret_exists(session.backend(), &args.path).await? {
            let overwrite = prompt::confirm(&format!(
                "Secrets path \"{}\" already exists. Do you wish to overwrite?",
                args.path
            ))?;
            if !overwrite {
                output::info("Aborting");
                return Ok(Outcome::Aborted);
            }
        }

        let count = env.len();
        output::progress("Writing secrets to Vault");
        if let Err(e) = session.write_secret(&args.path, env.data()).await {
            output::progress_done(false);
            return Err(e);
        }
        output::progress_done(true);
        info!(path = %args.path, count, "secrets pushed");

        output::success(&format!(
            "Secrets written to {}.",
            output::path(&args.path)
        ));
        Ok(Outcome::Completed)
    })
}
