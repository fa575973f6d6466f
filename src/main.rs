//! Vaultmap - Commit the shape of your secrets, not their values.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaultmap::cli::output;
use vaultmap::cli::{execute, Cli};
use vaultmap::core::constants::LOG_ENV;
use vaultmap::error::{ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("vaultmap=debug")
        } else {
            EnvFilter::new("vaultmap=warn")
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

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingPassword) => {
                Some("pass --password or set VAULTMAP_PASSWORD")
            }
            Error::Config(ConfigError::DirectoryNotFound(_)) => Some("check --directory"),
            Error::Failures(_) => Some("run with --verbose for details"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
