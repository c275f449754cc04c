//! Task: install the packages listed in the manifest.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::manifest::PackageManifest;
use crate::resources::package::{PackageManager, PackageResource};
use crate::resources::{Applicable, ResourceChange};

/// Install every package listed in the manifest, one command per package.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.layout.manifest_path().exists()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let path = ctx.layout.manifest_path();
        let manifest = PackageManifest::load(&path)
            .with_context(|| format!("loading manifest {}", path.display()))?;

        // Resolved before anything is installed: an unknown manager stops the
        // whole phase, in test mode too.
        let manager: PackageManager = manifest.manager.parse()?;

        if manifest.packages.is_empty() {
            return Ok(TaskResult::Skipped("no packages listed".to_string()));
        }

        ctx.log.debug(&format!(
            "{} packages to install with {manager}",
            manifest.packages.len()
        ));

        let mut stats = TaskStats::new();
        for name in &manifest.packages {
            let resource = PackageResource::new(name.clone(), manager, &*ctx.executor);

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would run `{}`", resource.command()));
                stats.changed += 1;
                continue;
            }

            ctx.log.info(&format!("installing {}", resource.description()));
            match resource.apply() {
                Ok(ResourceChange::Applied) => {
                    ctx.log.success(&format!("installed {name}"));
                    stats.changed += 1;
                }
                Ok(ResourceChange::Failed { reason }) => {
                    ctx.log
                        .warn(&format!("failed to install {name}: {reason}"));
                    stats.failed += 1;
                }
                Err(e) => {
                    ctx.log.warn(&format!("failed to install {name}: {e:#}"));
                    stats.failed += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}
