//! Profile commands.
//!
//! `make-profile`, `profiles` and `delete-profile` manage the local
//! profile store and never contact the backend.

use clap::Args;
use tracing::info;

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Outcome, Schema};
use crate::core::backend::parse_endpoint;
use crate::core::constants::{ENDPOINT_ENV, TOKEN_ENV};
use crate::core::profile::Profile;
use crate::error::{Result, ValidationError};

#[derive(Args, Debug)]
pub struct MakeProfileArgs {
    /// Profile name
    pub name: String,

    /// Vault endpoint URL
    #[arg(long, env = ENDPOINT_ENV, value_name = "URL")]
    pub endpoint_url: String,

    /// Vault token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, value_name = "TOKEN")]
    pub token: String,

    /// Overwrite an existing profile without asking
    #[arg(short, long)]
    pub force: bool,
}

pub struct MakeProfile {
    name: String,
    profile: Profile,
    force: bool,
}

impl Schema for MakeProfileArgs {
    type Valid = MakeProfile;

    fn validate(self) -> Result<MakeProfile> {
        let name = non_empty(self.name, "profile name")?;
        let endpoint_url = non_empty(self.endpoint_url, "endpoint url")?;
        let token = non_empty(self.token, "token")?;
        parse_endpoint(&endpoint_url)?;

        Ok(MakeProfile {
            name,
            profile: Profile::new(endpoint_url, token),
            force: self.force,
        })
    }
}

pub const MAKE_PROFILE: Descriptor<MakeProfile> = Descriptor {
    name: "make-profile",
    body: Body::Local(make_profile),
};

fn make_profile(args: MakeProfile, ctx: &Context) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        ctx.store.ensure_initialized()?;

        if ctx.store.get(&args.name)?.is_some() && !args.force {
            let overwrite = prompt::confirm(&format!(
                "Profile \"{}\" already exists. Do you wish to overwrite?",
                args.name
            ))?;
            if !overwrite {
                output::info("Aborting");
                return Ok(Outcome::Aborted);
            }
        }

        ctx.store.set(&args.name, args.profile)?;
        info!(profile = %args.name, "profile saved");

        output::success("Profile created.");
        Ok(Outcome::Completed)
    })
}

#[derive(Args, Debug)]
pub struct ProfilesArgs {}

impl Schema for ProfilesArgs {
    type Valid = ();

    fn validate(self) -> Result<()> {
        Ok(())
    }
}

pub const PROFILES: Descriptor<()> = Descriptor {
    name: "profiles",
    body: Body::Local(profiles),
};

fn profiles(_: (), ctx: &Context) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        let profiles = ctx.store.list()?;

        if profiles.is_empty() {
            output::dimmed("no profiles stored");
            return Ok(Outcome::Completed);
        }

        for (name, profile) in &profiles {
            output::kv(name, &profile.endpoint_url);
        }
        Ok(Outcome::Completed)
    })
}

#[derive(Args, Debug)]
pub struct DeleteProfileArgs {
    /// Profile name
    pub name: String,

    /// Delete without asking
    #[arg(short, long)]
    pub force: bool,
}

pub struct DeleteProfile {
    name: String,
    force: bool,
}

impl Schema for DeleteProfileArgs {
    type Valid = DeleteProfile;

    fn validate(self) -> Result<DeleteProfile> {
        Ok(DeleteProfile {
            name: non_empty(self.name, "profile name")?,
            force: self.force,
        })
    }
}

pub const DELETE_PROFILE: Descriptor<DeleteProfile> = Descriptor {
    name: "delete-profile",
    body: Body::Local(delete_profile),
};

fn delete_profile(args: DeleteProfile, ctx: &Context) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        if ctx.store.get(&args.name)?.is_none() {
            output::warn(&format!("Profile \"{}\" does not exist.", args.name));
            return Ok(Outcome::Aborted);
        }

        if !args.force {
            let confirmed =
                prompt::confirm(&format!("Delete profile \"{}\"?", args.name))?;
            if !confirmed {
                output::info("Aborting");
                return Ok(Outcome::Aborted);
            }
        }

        ctx.store.delete(&args.name)?;
        info!(profile = %args.name, "profile deleted");

        output::success("Profile deleted.");
        Ok(Outcome::Completed)
    })
}

fn non_empty(value: String, field: &'static str) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(ValidationError::Empty { field }.into());
    }
    Ok(value)
}
