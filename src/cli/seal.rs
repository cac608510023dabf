//! Seal and unseal commands.
//!
//! Both run against a backend in any seal state. `unseal` does not need a
//! token: without one the requests are sent unauthenticated.

use clap::Args;
use tokio::io::AsyncReadExt;
use tracing::info;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::credentials::CredentialOptions;
use crate::core::session::Session;
use crate::core::unseal::{self, ShareSource, UnsealOutcome};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SealArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

impl Schema for SealArgs {
    type Valid = ();

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<()> {
        Ok(())
    }
}

pub const SEAL: Descriptor<()> = Descriptor {
    name: "seal",
    body: Body::Remote(Gate::Any, seal),
};

fn seal(_: (), _: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        if session.seal_status().await?.sealed {
            output::info("Vault is already sealed.");
            return Ok(Outcome::Completed);
        }

        output::progress("Sealing Vault");
        if let Err(e) = session.seal().await {
            output::progress_done(false);
            return Err(e);
        }
        output::progress_done(true);
        info!("vault sealed");

        output::success("Vault sealed.");
        Ok(Outcome::Completed)
    })
}

#[derive(Args)]
pub struct UnsealArgs {
    /// Unseal key shares
    #[arg(conflicts_with = "stdin")]
    pub keys: Vec<String>,

    /// Read whitespace-separated key shares from stdin
    #[arg(long)]
    pub stdin: bool,

    #[command(flatten)]
    pub session: SessionArgs,
}

pub struct Unseal {
    keys: Vec<String>,
    stdin: bool,
}

impl Schema for UnsealArgs {
    type Valid = Unseal;

    /// Credential options with an empty token standing in for a missing one.
    fn credentials(&self) -> CredentialOptions {
        let mut options = self.session.options();
        if options.endpoint_url.is_some() && options.token.is_none() {
            options.token = Some(String::new());
        }
        options
    }

    fn validate(self) -> Result<Unseal> {
        Ok(Unseal {
            keys: self.keys,
            stdin: self.stdin,
        })
    }
}

pub const UNSEAL: Descriptor<Unseal> = Descriptor {
    name: "unseal",
    body: Body::Remote(Gate::Any, unseal_vault),
};

fn unseal_vault(args: Unseal, _: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let source = if args.stdin {
            let mut raw = Zeroizing::new(String::new());
            tokio::io::stdin().read_to_string(&mut raw).await?;
            ShareSource::Stream(raw.to_string())
        } else {
            ShareSource::Arguments(args.keys)
        };

        let outcome = unseal::unseal(session.backend(), source, |progress| {
            output::info(&format!(
                "Unsealing Vault ({}/{})",
                progress.submitted, progress.threshold
            ));
        })
        .await?;

        match outcome {
            UnsealOutcome::AlreadyUnsealed => output::info("Vault is already unsealed."),
            UnsealOutcome::Unsealed { submitted } => {
                info!(submitted, "vault unsealed");
                output::success("Vault unsealed.");
            }
        }
        Ok(Outcome::Completed)
    })
}
