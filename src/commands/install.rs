//! Command: install packages, reconcile links, run scripts.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GlobalOpts, InstallOpts, VERSION};
use crate::config::Layout;
use crate::exec::Executor;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context};

/// Run the install command.
///
/// Task failures are reported in the summary and do not fail the command.
///
/// # Errors
///
/// Returns an error if the root or home cannot be resolved, the settings
/// file is invalid, or the package manifest exists but cannot be opened.
pub fn run(
    global: &GlobalOpts,
    opts: &InstallOpts,
    log: &Arc<Logger>,
    executor: Arc<dyn Executor>,
) -> Result<()> {
    let root = super::resolve_root(global)?;
    let home = super::resolve_home(global)?;

    log.info(&format!("dotsync {VERSION}"));

    log.stage("Loading configuration");
    let layout = Layout::load(&root)?;
    log.debug(&format!("root: {}", root.display()));
    log.debug(&format!("home: {}", home.display()));

    let manifest = layout.manifest_path();
    if manifest.exists() {
        std::fs::File::open(&manifest)
            .with_context(|| format!("opening {}", manifest.display()))?;
    }

    if opts.test {
        log.info("test mode: nothing will be changed");
    }

    let ctx = Context::new(
        layout,
        home,
        opts.test,
        Arc::clone(log) as Arc<dyn Log>,
        executor,
    );

    let all_tasks = tasks::all_install_tasks();
    super::run_tasks(all_tasks.iter().map(AsRef::as_ref), &ctx, log);
    Ok(())
}
