//! External process execution.
use anyhow::{Context as _, Result};
use std::process::Command;

/// Abstraction over external process execution.
///
/// Production code uses [`SystemExecutor`]; tests substitute a mock so that
/// no real package manager or script is ever spawned.
#[cfg_attr(test, mockall::automock)]
pub trait Executor: Send + Sync {
    /// Run `program` with `args`, inheriting stdin/stdout/stderr, and block
    /// until it exits.
    ///
    /// Returns the exit code (`None` when the process was killed by a
    /// signal).  A non-zero exit is not an error; callers decide.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn run_inherited(&self, program: &str, args: &[String]) -> Result<Option<i32>>;

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run_inherited(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(status.code())
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render a program and its arguments for display.
#[must_use]
pub fn display_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
