//! Command-line interface.

pub mod completions;
pub mod output;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::constants::PASSWORD_ENV;

/// Vaultmap - Commit the shape of your secrets, not their values.
#[derive(Parser)]
#[command(
    name = "vaultmap",
    about = "Extract the key structure of encrypted secret files into mapping files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write mapping files for every secret file below a directory
    Run(RunArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments for `vaultmap run`.
#[derive(clap::Args)]
pub struct RunArgs {
    /// Directory to search recursively
    #[arg(short, long, default_value = ".")]
    pub directory: PathBuf,

    /// Vault password (prompted for when omitted)
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: Option<String>,

    /// Do not prefix keys in the encrypted originals
    #[arg(short, long)]
    pub keep_originals: bool,

    /// Config file (defaults to .vaultmap.toml in the directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    match command {
        Command::Run(args) => run::execute(args),
        Command::Completions { shell } => completions::execute(shell),
    }
}
