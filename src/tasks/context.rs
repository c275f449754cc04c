use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Layout;
use crate::exec::Executor;
use crate::logging::Log;

/// Shared context for task execution.
pub struct Context {
    /// Dotfiles repository layout.
    pub layout: Layout,
    /// Home directory that the backup tree mirrors.
    pub home: PathBuf,
    /// Test mode: report what would happen without changing anything.
    pub dry_run: bool,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("layout", &self.layout)
            .field("home", &self.home)
            .field("dry_run", &self.dry_run)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        layout: Layout,
        home: PathBuf,
        dry_run: bool,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            layout,
            home,
            dry_run,
            log,
            executor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::SystemExecutor;
    use crate::tasks::test_helpers::RecordingLog;
    use std::path::Path;

    #[test]
    fn debug_hides_trait_objects() {
        let ctx = Context::new(
            Layout::with_defaults(Path::new("/dotfiles")),
            PathBuf::from("/home/user"),
            true,
            Arc::new(RecordingLog::default()),
            Arc::new(SystemExecutor),
        );
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("<dyn Log>"));
        assert!(rendered.contains("/home/user"));
        assert!(rendered.contains("dry_run: true"));
    }
}
