//! Run command.
//!
//! Discovers secret files, asks for the vault password once, and processes
//! each file through the pipeline.

use std::io::{self, IsTerminal};

use dialoguer::Password;
use tracing::{debug, info};

use crate::cli::output;
use crate::cli::RunArgs;
use crate::core::cipher::{AgePassphrase, Credential};
use crate::core::config::Config;
use crate::core::discover::discover;
use crate::core::pipeline::{Pipeline, Report, Status};
use crate::error::{ConfigError, Error, Result};

/// Process every secret file below the requested directory.
pub fn execute(args: RunArgs) -> Result<()> {
    let mut config = Config::load(&args.directory, args.config.as_deref())?;
    if args.keep_originals {
        config.keep_originals = true;
    }
    debug!(?config, "effective config");

    let pipeline = Pipeline::from_config(AgePassphrase, &config)?;
    let paths = discover(&args.directory, pipeline.layout())?;

    if paths.is_empty() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&Report::default())?);
        } else {
            output::dimmed("no secret files found");
        }
        return Ok(());
    }
    info!(count = paths.len(), "found secret files");

    let credential = credential(args.password)?;
    let report = pipeline.run(&paths, &credential);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.has_failures() {
        return Err(Error::Failures(report.failed()));
    }
    Ok(())
}

/// Resolve the vault password from the flag/env or a hidden prompt.
fn credential(password: Option<String>) -> Result<Credential> {
    if let Some(p) = password {
        return Ok(Credential::new(p));
    }
    if !io::stdin().is_terminal() {
        return Err(ConfigError::MissingPassword.into());
    }
    let p = Password::new().with_prompt("Vault password").interact()?;
    Ok(Credential::new(p))
}

fn print_report(report: &Report) {
    for file in &report.files {
        let path = output::path(&file.path.display().to_string());
        match &file.status {
            Status::Rewritten => output::success(&format!("{} mapped, keys prefixed", path)),
            Status::Unchanged => output::success(&format!("{} mapped", path)),
            Status::Kept => output::success(&format!("{} mapped, original kept", path)),
            Status::Failed { kind, message } => {
                output::error(&format!("{} [{}] {}", path, kind, message));
            }
        }
    }

    output::rule();
    output::kv("mapped", report.mapped());
    output::kv("prefixed", report.rewritten());
    if report.has_failures() {
        output::kv("failed", report.failed());
    }
}
