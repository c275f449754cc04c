//! Resource primitives: things that can be described and applied.
pub mod helpers;
pub mod package;
pub mod script;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// A change that ran but did not succeed (e.g. an installer exiting
    /// non-zero) is reported as [`ResourceChange::Failed`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the change could not be attempted at all, such as
    /// when the program cannot be spawned.
    fn apply(&self) -> Result<ResourceChange>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use dotsync::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let failed = ResourceChange::Failed { reason: "exit code 100".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, failed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// The change was carried out.
    Applied,
    /// The change ran but did not succeed.
    Failed {
        /// Reason reported to the user.
        reason: String,
    },
}

impl ResourceChange {
    /// Map a process exit code to a change result.
    #[must_use]
    pub fn from_exit_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Applied,
            Some(code) => Self::Failed {
                reason: format!("exit code {code}"),
            },
            None => Self::Failed {
                reason: "terminated by signal".to_string(),
            },
        }
    }
}
