//! File-system helpers shared by the mirror operations.
use std::path::{Path, PathBuf};

use crate::error::MirrorError;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), MirrorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| MirrorError::from_io(parent, e))?;
    }
    Ok(())
}

/// Remove whatever exists at `path`: a file, a symlink (broken or not), or a
/// directory tree.  Does nothing if `path` does not exist.
///
/// Symlinks are removed themselves; their targets are never touched.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<(), MirrorError> {
    let Ok(meta) = path.symlink_metadata() else {
        return Ok(());
    };
    let result = if meta.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    result.map_err(|e| MirrorError::from_io(path, e))
}

/// Recursively copy a directory tree.
///
/// Symlinks within the source tree are *followed*: [`Path::is_dir`] follows
/// links, so directory symlinks are recursed into and file symlinks have
/// their content copied.
///
/// # Errors
///
/// Returns an error if the destination directory cannot be created, a source
/// entry cannot be read, or a file cannot be copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), MirrorError> {
    std::fs::create_dir_all(dst).map_err(|e| MirrorError::from_io(dst, e))?;
    for entry in std::fs::read_dir(src).map_err(|e| MirrorError::from_io(src, e))? {
        let entry = entry.map_err(|e| MirrorError::from_io(src, e))?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path).map_err(|e| MirrorError::from_io(&src_path, e))?;
        }
    }
    Ok(())
}

/// Sibling path used to stage a copy of `target` before it replaces the
/// original.  Kept on the same filesystem so the final rename is atomic.
#[must_use]
pub fn staging_path(target: &Path) -> PathBuf {
    let name = target.file_name().map_or_else(
        || "dotsync_tmp".to_string(),
        |n| format!("{}.dotsync_tmp", n.to_string_lossy()),
    );
    target.with_file_name(name)
}

/// Copy `source` (file or directory) over `target`.
///
/// The copy is staged into a sibling path first; only when it is complete is
/// the existing `target` removed and the staged copy renamed into place.  On
/// failure the staging path is cleaned up and `target` is left as it was
/// unless the failure happened after removal.
///
/// # Errors
///
/// Returns [`MirrorError::NotFound`] if `source` does not exist, or the
/// classified I/O error of the failing step.
pub fn copy_into_place(source: &Path, target: &Path) -> Result<(), MirrorError> {
    if !source.exists() {
        return Err(MirrorError::NotFound {
            path: source.to_path_buf(),
        });
    }

    let tmp = staging_path(target);
    remove_existing(&tmp)?;

    let staged = if source.is_dir() {
        copy_dir_recursive(source, &tmp)
    } else {
        std::fs::copy(source, &tmp)
            .map(|_| ())
            .map_err(|e| MirrorError::from_io(source, e))
    };

    let cleanup = || {
        let _ = remove_existing(&tmp);
    };

    if let Err(e) = staged {
        cleanup();
        return Err(e);
    }
    if let Err(e) = remove_existing(target) {
        cleanup();
        return Err(e);
    }
    if let Err(e) = std::fs::rename(&tmp, target) {
        cleanup();
        return Err(MirrorError::from_io(target, e));
    }
    Ok(())
}
