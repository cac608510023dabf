//! kvault - manage Vault key/value secrets from the command line.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kvault::cli::output;
use kvault::cli::{execute, Cli};
use kvault::core::constants::LOG_ENV;
use kvault::error::Error;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("kvault=debug")
        } else {
            EnvFilter::new("kvault=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            output::error(&format!("failed to start runtime: {}", e));
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(execute(cli));
    drop(runtime);

    match result {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            let suggestion = match &e {
                Error::Sealed => Some("run: kvault unseal".to_string()),
                Error::MissingCredentials => {
                    Some("pass --profile, or --endpoint-url and --token".to_string())
                }
                Error::ProfileNotFound(name) => Some(format!(
                    "run: kvault make-profile {} --endpoint-url <url> --token <token>",
                    name
                )),
                Error::InsufficientShares { .. } | Error::UnsealIncomplete { .. } => {
                    Some("provide more unseal keys".to_string())
                }
                _ => None,
            };

            output::error(&e.to_string());
            if let Some(hint) = suggestion {
                output::hint(&hint);
            }
            std::process::exit(1);
        }
    }
}
