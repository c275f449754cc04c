//! Task: run post-install scripts.
use anyhow::Result;

use super::{Context, Task, TaskResult, TaskStats};
use crate::resources::script::{self, ScriptResource};
use crate::resources::{Applicable, ResourceChange};

/// Run the user's post-install scripts.
///
/// Exit statuses are reported but never fail the task.
#[derive(Debug)]
pub struct RunScripts;

impl Task for RunScripts {
    fn name(&self) -> &'static str {
        "Run scripts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.layout.scripts_dir().is_dir()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let scripts = script::discover(&ctx.layout.scripts_dir(), ctx.layout.script_extension())?;
        if scripts.is_empty() {
            return Ok(TaskResult::Skipped("no scripts found".to_string()));
        }

        let mut stats = TaskStats::new();
        for path in scripts {
            let resource = ScriptResource::new(path, &*ctx.executor);

            if ctx.dry_run {
                ctx.log
                    .dry_run(&format!("would run `{}`", resource.description()));
                stats.changed += 1;
                continue;
            }

            ctx.log.info(&format!("running {}", resource.path.display()));
            match resource.apply() {
                Ok(ResourceChange::Applied) => stats.changed += 1,
                Ok(ResourceChange::Failed { reason }) => {
                    ctx.log
                        .warn(&format!("{}: {reason}", resource.path.display()));
                    stats.failed += 1;
                }
                Err(e) => {
                    ctx.log
                        .warn(&format!("{}: {e:#}", resource.path.display()));
                    stats.failed += 1;
                }
            }
        }

        Ok(stats.finish(ctx))
    }
}
