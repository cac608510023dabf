//! Command-line interface.

pub mod completions;
pub mod mount;
pub mod output;
pub mod pipe;
pub mod profile;
pub mod prompt;
pub mod pull;
pub mod push;
pub mod remove;
pub mod seal;
pub mod shell;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::constants::{ENDPOINT_ENV, TOKEN_ENV};
use crate::core::credentials::CredentialOptions;
use crate::error::Result;
use shell::{dispatch, Context, Outcome};

/// kvault - manage Vault key/value secrets from the command line.
#[derive(Parser)]
#[command(
    name = "kvault",
    about = "Manage Vault key/value secrets from the command line",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Working directory for relative file paths
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create or replace a named profile
    MakeProfile(profile::MakeProfileArgs),

    /// List stored profiles
    Profiles(profile::ProfilesArgs),

    /// Delete a stored profile
    DeleteProfile(profile::DeleteProfileArgs),

    /// Mount a kv-v2 secret engine
    Mount(mount::MountArgs),

    /// Unmount a secret engine
    Unmount(mount::UnmountArgs),

    /// Push an environment file to a secrets path
    Push(push::PushArgs),

    /// Pull secrets from a secrets path
    Pull(pull::PullArgs),

    /// Run a command with secrets added to its environment
    Pipe(pipe::PipeArgs),

    /// Remove a secrets path or some of its versions
    Rm(remove::RemoveArgs),

    /// Seal the vault
    Seal(seal::SealArgs),

    /// Unseal the vault with key shares
    Unseal(seal::UnsealArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Credential options shared by every command that talks to the backend.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Name of the profile to use
    #[arg(short = 'P', long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Vault endpoint URL
    #[arg(long, env = ENDPOINT_ENV, value_name = "URL")]
    pub endpoint_url: Option<String>,

    /// Vault token
    #[arg(long, env = TOKEN_ENV, hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,
}

impl SessionArgs {
    pub fn options(&self) -> CredentialOptions {
        CredentialOptions {
            profile: self.profile.clone(),
            endpoint_url: self.endpoint_url.clone(),
            token: self.token.clone(),
        }
    }
}

/// Execute the parsed command line.
pub async fn execute(cli: Cli) -> Result<Outcome> {
    let ctx = Context::new(cli.cwd)?;
    run(cli.command, &ctx).await
}

/// Execute `command` in `ctx`.
pub async fn run(command: Command, ctx: &Context) -> Result<Outcome> {
    use Command::*;

    match command {
        MakeProfile(args) => dispatch(&profile::MAKE_PROFILE, args, ctx).await,
        Profiles(args) => dispatch(&profile::PROFILES, args, ctx).await,
        DeleteProfile(args) => dispatch(&profile::DELETE_PROFILE, args, ctx).await,
        Mount(args) => dispatch(&mount::MOUNT, args, ctx).await,
        Unmount(args) => dispatch(&mount::UNMOUNT, args, ctx).await,
        Push(args) => dispatch(&push::PUSH, args, ctx).await,
        Pull(args) => dispatch(&pull::PULL, args, ctx).await,
        Pipe(args) => dispatch(&pipe::PIPE, args, ctx).await,
        Rm(args) => dispatch(&remove::REMOVE, args, ctx).await,
        Seal(args) => dispatch(&seal::SEAL, args, ctx).await,
        Unseal(args) => dispatch(&seal::UNSEAL, args, ctx).await,
        Completions(args) => dispatch(&completions::COMPLETIONS, args, ctx).await,
    }
}
