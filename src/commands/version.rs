//! Commands: version information and shell completions.
use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::{Cli, VERSION};

/// Print the version to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be written.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "dotsync {VERSION}")?;
    Ok(())
}

/// Write completions for `shell` to `out`.
pub fn completions(shell: clap_complete::Shell, out: &mut impl Write) {
    clap_complete::generate(shell, &mut Cli::command(), "dotsync", out);
}
