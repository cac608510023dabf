//! Pull command.
//!
//! Downloads the latest version of a secrets path and prints it or writes
//! it to a file.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::credentials::CredentialOptions;
use crate::core::env::{self, Env, Format};
use crate::core::path::SecretPath;
use crate::core::session::Session;
use crate::error::{Error, Result};

#[derive(Args, Debug)]
pub struct PullArgs {
    /// Secrets path, e.g. secret/app
    pub secrets_path: String,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Output format: dotenv, json or shell
    #[arg(short = 'F', long, default_value = "dotenv", value_name = "FORMAT")]
    pub format: String,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Overwrite the output file without asking
    #[arg(short, long)]
    pub force: bool,
}

pub struct Pull {
    path: SecretPath,
    output_file: Option<PathBuf>,
    format: Format,
    force: bool,
}

impl Schema for PullArgs {
    type Valid = Pull;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<Pull> {
        Ok(Pull {
            path: SecretPath::parse(&self.secrets_path)?,
            output_file: self.output_file.filter(|p| !p.as_os_str().is_empty()),
            format: self.format.parse()?,
            force: self.force,
        })
    }
}

pub const PULL: Descriptor<Pull> = Descriptor {
    name: "pull",
    body: Body::Remote(Gate::Unsealed, pull),
};

fn pull(args: Pull, ctx: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let data = session
            .read_secret(&args.path)
            .await?
            .ok_or_else(|| Error::NotFound(args.path.to_string()))?;
        info!(path = %args.path, count = data.len(), format = %args.format, "secrets pulled");

        let Some(output_file) = args.output_file else {
            print!("{}", env::render(&data, args.format)?);
            return Ok(Outcome::Completed);
        };

        let target = ctx.resolve(output_file)?;
        if target.exists() && !args.force {
            let overwrite = prompt::confirm(&format!(
                "The file {} already exists. Do you want to overwrite it?",
                target.display()
            ))?;
            if !overwrite {
                output::info("Aborting");
                return Ok(Outcome::Refused);
            }
        }

        Env::from_data(data, target.clone()).save(args.format)?;

        output::success(&format!(
            "Secrets written to {}.",
            output::path(target.display())
        ));
        Ok(Outcome::Completed)
    })
}
