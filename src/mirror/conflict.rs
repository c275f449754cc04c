//! Destination observation and the per-entry link decision.
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::MirrorError;
use crate::resources::helpers::fs::ensure_parent_dir;
use crate::resources::symlink;

/// Kind of entry found in the backup tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory; materialized as a real directory in home.
    Directory,
    /// A regular file; linked into home.
    File,
}

/// One entry of the backup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Absolute path inside the backup tree.
    pub source: PathBuf,
    /// Path relative to the backup root.
    pub relative: PathBuf,
    /// Entry kind.
    pub kind: EntryKind,
}

/// What currently occupies a destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing exists at the path (not even a broken symlink).
    Absent,
    /// The path is, or resolves to, the backup entry itself.
    CorrectSymlink,
    /// A regular file that is not the backup entry.
    ForeignFile,
    /// A symlink pointing elsewhere, including broken symlinks.
    ForeignSymlink,
    /// A real directory.
    Directory,
}

/// Action chosen for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a symlink to the backup entry.
    CreateSymlink,
    /// Create a real directory.
    CreateDirectory,
    /// Nothing to do.
    AlreadyLinked,
    /// Rename the destination to its backup name, then link.
    BackupThenLink,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateSymlink => write!(f, "link"),
            Self::CreateDirectory => write!(f, "mkdir"),
            Self::AlreadyLinked => write!(f, "already linked"),
            Self::BackupThenLink => write!(f, "backup and link"),
        }
    }
}

/// Observe the destination of a backup entry.
///
/// Uses `symlink_metadata`, so a broken symlink is reported as
/// [`DestinationState::ForeignSymlink`] rather than absent.
///
/// # Errors
///
/// Returns the classified I/O error when the destination cannot be inspected
/// for a reason other than not existing.
pub fn observe(dest: &Path, source: &Path) -> Result<DestinationState, MirrorError> {
    let meta = match dest.symlink_metadata() {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(DestinationState::Absent);
        }
        Err(e) => return Err(MirrorError::from_io(dest, e)),
    };

    if symlink::points_to(dest, source) || symlink::resolves_to(dest, source) {
        return Ok(DestinationState::CorrectSymlink);
    }

    Ok(if meta.is_symlink() {
        DestinationState::ForeignSymlink
    } else if meta.is_dir() {
        DestinationState::Directory
    } else {
        DestinationState::ForeignFile
    })
}

/// Decide what to do for an entry of `kind` whose destination is in `state`.
///
/// Directory entries are never replaced: an existing destination of any kind
/// is left alone and only an absent one is created.
#[must_use]
pub const fn resolve(kind: EntryKind, state: DestinationState) -> Action {
    match (kind, state) {
        (EntryKind::Directory, DestinationState::Absent) => Action::CreateDirectory,
        (EntryKind::Directory, _) | (EntryKind::File, DestinationState::CorrectSymlink) => {
            Action::AlreadyLinked
        }
        (EntryKind::File, DestinationState::Absent) => Action::CreateSymlink,
        (
            EntryKind::File,
            DestinationState::ForeignFile
            | DestinationState::ForeignSymlink
            | DestinationState::Directory,
        ) => Action::BackupThenLink,
    }
}

/// Path a displaced destination is renamed to.
///
/// The extension is replaced by `bak`: `config.toml` becomes `config.bak`,
/// while `.bashrc` (no extension) becomes `.bashrc.bak`.  A name already
/// ending in `.bak` gets a second suffix so the backup never equals `dest`.
#[must_use]
pub fn backup_path(dest: &Path) -> PathBuf {
    let replaced = dest.with_extension("bak");
    if replaced != dest {
        return replaced;
    }
    let mut name = dest.file_name().map_or_else(OsString::new, ToOwned::to_owned);
    name.push(".bak");
    dest.with_file_name(name)
}

/// Carry out `action` for `entry` at `dest`.
///
/// Parent directories of `dest` are created first.  An earlier backup file
/// or symlink at [`backup_path`] is overwritten; a directory there is never
/// removed.
///
/// # Errors
///
/// Returns [`MirrorError::BackupBlocked`] when a directory occupies the
/// backup path (`dest` is left untouched), [`MirrorError::FilesystemDenied`]
/// when permission is refused, or the classified I/O error of the failing
/// step.
pub fn apply(action: Action, entry: &LinkEntry, dest: &Path) -> Result<(), MirrorError> {
    match action {
        Action::AlreadyLinked => Ok(()),
        Action::CreateDirectory => {
            std::fs::create_dir_all(dest).map_err(|e| MirrorError::from_io(dest, e))
        }
        Action::CreateSymlink => {
            ensure_parent_dir(dest)?;
            link(entry, dest)
        }
        Action::BackupThenLink => {
            ensure_parent_dir(dest)?;
            let backup = backup_path(dest);
            clear_backup_slot(&backup)?;
            std::fs::rename(dest, &backup).map_err(|e| MirrorError::from_io(dest, e))?;
            link(entry, dest)
        }
    }
}

/// Make room for a new backup: remove a previous backup file or symlink,
/// refuse when a real directory is there.
fn clear_backup_slot(backup: &Path) -> Result<(), MirrorError> {
    match backup.symlink_metadata() {
        Ok(meta) if meta.is_dir() => Err(MirrorError::BackupBlocked {
            path: backup.to_path_buf(),
        }),
        Ok(_) => std::fs::remove_file(backup).map_err(|e| MirrorError::from_io(backup, e)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MirrorError::from_io(backup, e)),
    }
}

fn link(entry: &LinkEntry, dest: &Path) -> Result<(), MirrorError> {
    symlink::create_symlink(&entry.source, dest).map_err(|e| MirrorError::from_io(dest, e))
}
