//! Post-install script resource.
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Applicable, ResourceChange};
use crate::exec::Executor;

/// Interpreter used to run scripts.
pub const INTERPRETER: &str = "bash";

/// List the scripts directly inside `dir` whose extension is `extension`,
/// sorted by file name.  Subdirectories are not searched.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut scripts = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("reading entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            scripts.push(path);
        }
    }
    scripts.sort();
    Ok(scripts)
}

/// A user-authored script run with [`INTERPRETER`].
pub struct ScriptResource<'a> {
    /// Script file.
    pub path: PathBuf,
    executor: &'a dyn Executor,
}

impl fmt::Debug for ScriptResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptResource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'a> ScriptResource<'a> {
    /// Create a new script resource.
    #[must_use]
    pub const fn new(path: PathBuf, executor: &'a dyn Executor) -> Self {
        Self { path, executor }
    }
}

impl Applicable for ScriptResource<'_> {
    fn description(&self) -> String {
        format!("{INTERPRETER} {}", self.path.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        let args = vec![self.path.to_string_lossy().into_owned()];
        let code = self.executor.run_inherited(INTERPRETER, &args)?;
        Ok(ResourceChange::from_exit_code(code))
    }
}
