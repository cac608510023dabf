//! Engine commands.

use clap::Args;
use tracing::info;

use crate::cli::output;
use crate::cli::shell::{Body, BoxFuture, Context, Descriptor, Gate, Outcome, Schema};
use crate::cli::SessionArgs;
use crate::core::constants::KV_ENGINE;
use crate::core::credentials::CredentialOptions;
use crate::core::session::Session;
use crate::error::{Error, Result, ValidationError};

#[derive(Args, Debug)]
pub struct MountArgs {
    /// Mount path of the new engine, e.g. secret
    pub mount_path: String,

    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Args, Debug)]
pub struct UnmountArgs {
    /// Mount path of the engine to remove
    pub mount_path: String,

    #[command(flatten)]
    pub session: SessionArgs,
}

/// A validated engine mount path.
pub struct MountPath(String);

impl Schema for MountArgs {
    type Valid = MountPath;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<MountPath> {
        normalize(&self.mount_path)
    }
}

impl Schema for UnmountArgs {
    type Valid = MountPath;

    fn credentials(&self) -> CredentialOptions {
        self.session.options()
    }

    fn validate(self) -> Result<MountPath> {
        normalize(&self.mount_path)
    }
}

fn normalize(raw: &str) -> Result<MountPath> {
    let mount = raw.trim().trim_matches('/');
    if mount.is_empty() {
        return Err(ValidationError::Empty {
            field: "mount path",
        }
        .into());
    }
    Ok(MountPath(mount.to_string()))
}

pub const MOUNT: Descriptor<MountPath> = Descriptor {
    name: "mount",
    body: Body::Remote(Gate::Unsealed, mount),
};

pub const UNMOUNT: Descriptor<MountPath> = Descriptor {
    name: "unmount",
    body: Body::Remote(Gate::Unsealed, unmount),
};

fn mount(MountPath(mount): MountPath, _: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        if session.engine_exists(&mount).await? {
            return Err(Error::EngineExists(mount));
        }

        output::progress(&format!("Mounting {}", mount));
        if let Err(e) = session.mount_engine(&mount, KV_ENGINE).await {
            output::progress_done(false);
            return Err(e);
        }
        output::progress_done(true);
        info!(mount = %mount, "engine mounted");

        output::success(&format!("Successfully mounted {}", output::path(&mount)));
        Ok(Outcome::Completed)
    })
}

fn unmount(MountPath(mount): MountPath, _: &Context, session: Session) -> BoxFuture<'_, Result<Outcome>> {
    Box::pin(async move {
        if !session.engine_exists(&mount).await? {
            return Err(Error::NotFound(format!("secret engine {}", mount)));
        }

        output::progress(&format!("Unmounting {}", mount));
        if let Err(e) = session.unmount_engine(&mount).await {
            output::progress_done(false);
            return Err(e);
        }
        output::progress_done(true);
        info!(mount = %mount, "engine unmounted");

        output::success(&format!("Successfully unmounted {}", output::path(&mount)));
        Ok(Outcome::Completed)
    })
}
