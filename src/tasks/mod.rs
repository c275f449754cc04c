//! Named tasks that make up the install command.
mod context;
pub mod links;
pub mod packages;
pub mod scripts;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Result of a single task execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do.
    Skipped(String),
    /// Task ran in test mode.
    DryRun,
}

/// Counters for tasks that process many items.
///
/// # Examples
///
/// ```
/// use dotsync::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 3, already_ok: 10, failed: 0 };
/// assert_eq!(stats.summary(false), "3 changed, 10 already ok");
/// assert_eq!(stats.summary(true), "3 would change, 10 already ok");
///
/// let stats = TaskStats { changed: 1, already_ok: 2, failed: 3 };
/// assert_eq!(stats.summary(false), "1 changed, 2 already ok, 3 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items that failed; the task carried on past them.
    pub failed: u32,
}

impl TaskStats {
    /// Create a new empty stats counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        if self.failed > 0 {
            format!(
                "{} {verb}, {} already ok, {} failed",
                self.changed, self.already_ok, self.failed
            )
        } else {
            format!("{} {verb}, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        ctx.log.info(&self.summary(ctx.dry_run));
        if ctx.dry_run {
            TaskResult::DryRun
        } else {
            TaskResult::Ok
        }
    }
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task has anything to act on.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error when the whole phase cannot proceed, such as an
    /// unparsable manifest or an unsupported package manager.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The install tasks, in execution order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallPackages),
        Box::new(links::ReconcileLinks),
        Box::new(scripts::RunScripts),
    ]
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return;
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::RecordingExecutor;
    use std::path::Path;
    use std::sync::Arc;
    use test_helpers::make_context;

    /// A mock task for testing `execute()`.
    struct MockTask {
        name: &'static str,
        should_run: bool,
        result: Result<TaskResult, String>,
    }

    impl Task for MockTask {
        fn name(&self) -> &str {
            self.name
        }
        fn should_run(&self, _ctx: &Context) -> bool {
            self.should_run
        }
        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            self.result.clone().map_err(|s| anyhow::anyhow!("{s}"))
        }
    }

    fn run_mock(should_run: bool, result: Result<TaskResult, String>) -> TaskStatus {
        let (ctx, log) = make_context(
            Path::new("/dotfiles"),
            Path::new("/home/user"),
            false,
            Arc::new(RecordingExecutor::new()),
        );
        let task = MockTask {
            name: "mock",
            should_run,
            result,
        };
        execute(&task, &ctx);
        log.tasks()[0].1
    }

    #[test]
    fn execute_skips_non_applicable_task() {
        assert_eq!(run_mock(false, Ok(TaskResult::Ok)), TaskStatus::NotApplicable);
    }

    #[test]
    fn execute_records_ok_task() {
        assert_eq!(run_mock(true, Ok(TaskResult::Ok)), TaskStatus::Ok);
    }

    #[test]
    fn execute_records_failed_task() {
        assert_eq!(
            run_mock(true, Err("kaboom".to_string())),
            TaskStatus::Failed
        );
    }

    #[test]
    fn execute_records_skipped_task() {
        assert_eq!(
            run_mock(true, Ok(TaskResult::Skipped("not needed".to_string()))),
            TaskStatus::Skipped
        );
    }

    #[test]
    fn execute_records_dry_run_task() {
        assert_eq!(run_mock(true, Ok(TaskResult::DryRun)), TaskStatus::DryRun);
    }

    #[test]
    fn install_tasks_run_in_fixed_order() {
        let names: Vec<String> = all_install_tasks()
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        insta::assert_snapshot!(names.join(", "), @"Install packages, Reconcile links, Run scripts");
    }
}
