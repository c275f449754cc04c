//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string: `DOTSYNC_VERSION` when set at build time, else the crate
/// version.
pub const VERSION: &str = match option_env!("DOTSYNC_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "dotsync",
    about = "Keep dotfiles in a backup tree, link them into home, install packages",
    version = VERSION
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override dotfiles root directory (default: $DOTSYNC_ROOT, then the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override home directory (default: $HOME)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactively create the package manifest, export configs, and record post-install commands
    Setup,
    /// Install packages, link the backup tree into home, and run post-install scripts
    Install(InstallOpts),
    /// Print version information
    Version,
    /// Generate shell completions
    Completions(CompletionsOpts),
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Install(_) => "install",
            Self::Version => "version",
            Self::Completions(_) => "completions",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Test mode: report what would happen without changing anything
    #[arg(short = 't', long = "test", visible_alias = "dry-run")]
    pub test: bool,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
