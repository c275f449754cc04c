//! Task: link the backup tree into the home directory.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult, TaskStats};
use crate::mirror::conflict::{Action, backup_path};
use crate::mirror::{LinkReport, Outcome, reconcile};

/// Link the backup tree into the home directory.
#[derive(Debug)]
pub struct ReconcileLinks;

impl Task for ReconcileLinks {
    fn name(&self) -> &'static str {
        "Reconcile links"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.layout.backup_dir().is_dir()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let backup_dir = ctx.layout.backup_dir();
        let reports = reconcile(&backup_dir, &ctx.home, ctx.dry_run)
            .with_context(|| format!("reconciling {}", backup_dir.display()))?;

        let mut stats = TaskStats::new();
        for report in &reports {
            log_report(ctx, report, &mut stats);
        }
        Ok(stats.finish(ctx))
    }
}

fn log_report(ctx: &Context, report: &LinkReport, stats: &mut TaskStats) {
    let dest = report.destination.display();
    let source = report.entry.source.display();

    if report.is_unchanged() {
        ctx.log.debug(&format!("ok: {dest}"));
        stats.already_ok += 1;
        return;
    }

    match (&report.outcome, report.action) {
        (Outcome::Failed(reason), _) => {
            ctx.log.warn(&format!("{dest}: {reason}"));
            stats.failed += 1;
        }
        (Outcome::Planned, Some(Action::BackupThenLink)) => {
            ctx.log.dry_run(&format!(
                "would back up {dest} to {} and link it to {source}",
                backup_path(&report.destination).display()
            ));
            stats.changed += 1;
        }
        (Outcome::Planned, Some(action)) => {
            ctx.log
                .dry_run(&format!("would {action} {dest} -> {source}"));
            stats.changed += 1;
        }
        (Outcome::Applied, Some(Action::BackupThenLink)) => {
            ctx.log.info(&format!(
                "backed up {dest} to {}",
                backup_path(&report.destination).display()
            ));
            ctx.log.debug(&format!("linked {dest} -> {source}"));
            stats.changed += 1;
        }
        (Outcome::Applied | Outcome::Planned, _) => {
            ctx.log.debug(&format!("{dest} -> {source}"));
            stats.changed += 1;
        }
    }
}
