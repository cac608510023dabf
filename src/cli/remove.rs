//! Remove command.

use clap::Args;
use tracing::info;

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::backend::secret_exists;
use crate::core::credentials::CredentialOptions;
use crate::core::path::SecretPath;
use crate::core::session::Session;
use crate::error::{Result, ValidationError};

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Secrets path, e.g. secret/app
    pub secrets_path: String,

    /// Versions to delete; without any, the path and its history are removed
    pub versions: Vec<String>,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Remove without asking
    #[arg(short, long)]
    pub force: bool,
}

pub struct Remove {
    path: SecretPath,
    versions: Vec<u64>,
    force: bool,
}

impl Schema for RemoveArgs {
    type Valid = Remove;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<Remove> {
        let path = SecretPath::parse(&self.secrets_path)?;
        let versions = self
            .versions
            .iter()
            .map(String::as_str)
            .map(parse_version)
            .collect::<Result<Vec<_>>>()?;

        Ok(Remove {
            path,
            versions,
            force: self.force,
        })
    }
}

fn parse_version(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(version) if version > 0 => Ok(version),
        _ => Err(ValidationError::InvalidVersion(raw.to_string()).into()),
    }
}

pub const REMOVE: Descriptor<Remove> = Descriptor {
    name: "rm",
    body: Body::Remote(Gate::Unsealed, remove),
};

fn remove(args: Remove, _: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        if !secret_exists(session.backend(), &args.path).await? {
            output::warn(&format!(
                "The path {} does not exist. Nothing to remove.",
                output::path(&args.path)
            ));
            return Ok(Outcome::Aborted);
        }

        if !args.force {
            let question = if args.versions.is_empty() {
                format!("Are you sure you want to remove everything at {}?", args.path)
            } else {
                let versions: Vec<String> = args.versions.iter().map(u64::to_string).collect();
                format!(
                    "Are you sure you want to remove the following versions of {}? ({})",
                    args.path,
                    versions.join(", ")
                )
            };
            if !prompt::confirm(&question)? {
                output::info("Aborted.");
                return Ok(Outcome::Aborted);
            }
        }

        output::progress(&format!("Removing {}", args.path));
        let result = if args.versions.is_empty() {
            session.delete_secret_metadata(&args.path).await
        } else {
            session
                .delete_secret_versions(&args.path, &args.versions)
                .await
        };
        output::progress_done(result.is_ok());
        result?;
        info!(path = %args.path, versions = ?args.versions, "secrets removed");

        output::success(&format!("Successfully removed {}", output::path(&args.path)));
        Ok(Outcome::Completed)
    })
}
