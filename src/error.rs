//! Domain-specific error types for the dotsync engine.
//!
//! Internal modules return typed errors ([`MirrorError`], [`ManifestError`])
//! while task and command handlers convert them to [`anyhow::Error`] via the
//! standard `?` operator.
//!
//! - [`MirrorError`]: path mapping, links, export copies
//! - [`ManifestError`]: package manifest parsing and dispatch

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while mapping, linking, or copying entries between the home
/// directory and the backup tree.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The path is not lexically under the root it was mapped against.
    #[error("{path} is not under {root}")]
    InvalidRelation {
        /// Path that was being mapped.
        path: PathBuf,
        /// Root the path was expected to live under.
        root: PathBuf,
    },

    /// The process lacks permission to read or modify the path.
    #[error("permission denied: {path}")]
    FilesystemDenied {
        /// Path for which permission was denied.
        path: PathBuf,
    },

    /// A source path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Missing path.
        path: PathBuf,
    },

    /// A directory occupies the path a displaced file would be renamed to.
    #[error("cannot back up to {path}: a directory is in the way")]
    BackupBlocked {
        /// Occupied backup path.
        path: PathBuf,
    },

    /// Any other I/O failure.
    #[error("{path}: {source}")]
    Io {
        /// Path the failing operation touched.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

impl MirrorError {
    /// Classify an I/O error raised while touching `path`.
    ///
    /// `PermissionDenied` becomes [`MirrorError::FilesystemDenied`] and
    /// `NotFound` becomes [`MirrorError::NotFound`]; everything else is kept
    /// as [`MirrorError::Io`].
    #[must_use]
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::FilesystemDenied {
                path: path.to_path_buf(),
            },
            io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    /// Return `true` for errors that traversal skips silently.
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        matches!(self, Self::FilesystemDenied { .. })
    }
}

/// Errors raised while reading the package manifest or dispatching installs.
///
/// All variants are fatal to the package phase only; link reconciliation and
/// script execution still run.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// No `Package Manager: <name>` header line was found.
    #[error("no 'Package Manager:' header found in manifest")]
    MissingManifestHeader,

    /// The manifest names a package manager without an install template.
    #[error("unsupported package manager: {0}")]
    UnsupportedManager(String),

    /// The manifest file could not be read or written.
    #[error("manifest {path}: {source}")]
    Io {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn invalid_relation_display() {
        let e = MirrorError::InvalidRelation {
            path: PathBuf::from("/etc/hosts"),
            root: PathBuf::from("/home/user"),
        };
        assert_eq!(e.to_string(), "/etc/hosts is not under /home/user");
    }

    #[test]
    fn from_io_classifies_permission_denied() {
        let e = MirrorError::from_io(
            Path::new("/root/.bashrc"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.is_denied());
        assert_eq!(e.to_string(), "permission denied: /root/.bashrc");
    }

    #[test]
    fn from_io_classifies_not_found() {
        let e = MirrorError::from_io(
            Path::new("/nope"),
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(e, MirrorError::NotFound { .. }));
    }

    #[test]
    fn from_io_keeps_other_errors() {
        let e = MirrorError::from_io(
            Path::new("/x"),
            io::Error::new(io::ErrorKind::AlreadyExists, "exists"),
        );
        assert!(matches!(e, MirrorError::Io { .. }));
        assert!(!e.is_denied());
    }

    #[test]
    fn backup_blocked_display() {
        let e = MirrorError::BackupBlocked {
            path: PathBuf::from("/home/u/.config/app.bak"),
        };
        assert_eq!(
            e.to_string(),
            "cannot back up to /home/u/.config/app.bak: a directory is in the way"
        );
    }

    #[test]
    fn manifest_error_display() {
        assert_eq!(
            ManifestError::UnsupportedManager("apk".to_string()).to_string(),
            "unsupported package manager: apk"
        );
        assert!(
            ManifestError::MissingManifestHeader
                .to_string()
                .contains("Package Manager:")
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<MirrorError>();
        assert_send_sync::<ManifestError>();
    }

    #[test]
    fn manifest_error_converts_to_anyhow() {
        let e = ManifestError::UnsupportedManager("x".to_string());
        let _anyhow_err: anyhow::Error = e.into();
    }
}
