//! Top-level subcommand orchestration.
pub mod install;
pub mod setup;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Environment variable naming the dotfiles root.
pub const ROOT_ENV: &str = "DOTSYNC_ROOT";

/// Resolve the dotfiles root: `--root`, then `$DOTSYNC_ROOT`, then the
/// current directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined.
pub fn resolve_root(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return Ok(root.clone());
    }
    if let Some(root) = std::env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    Ok(std::env::current_dir()?)
}

/// Resolve the home directory: `--home`, then `$HOME` (`%USERPROFILE%` on
/// Windows).
///
/// # Errors
///
/// Returns an error if no home directory is configured.
pub fn resolve_home(global: &GlobalOpts) -> Result<PathBuf> {
    if let Some(ref home) = global.home {
        return Ok(home.clone());
    }
    let from_env = if cfg!(target_os = "windows") {
        std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))
    } else {
        std::env::var_os("HOME")
    };
    from_env
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory; use --home or set HOME"))
}

/// Execute every task in order, then print the summary.
///
/// Task failures are recorded and reported; they do not stop later tasks.
pub fn run_tasks<'a>(tasks: impl IntoIterator<Item = &'a dyn Task>, ctx: &Context, log: &Logger) {
    for task in tasks {
        tasks::execute(task, ctx);
    }
    log.print_summary();
}
