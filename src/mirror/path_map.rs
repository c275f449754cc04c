//! Relative-structure path mapping between two roots.
use std::path::{Path, PathBuf};

use crate::error::MirrorError;

/// Return `entry` relative to `root`.
///
/// Purely lexical: no filesystem access, no symlink resolution.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidRelation`] if `entry` is not under `root`.
pub fn relative<'a>(entry: &'a Path, root: &Path) -> Result<&'a Path, MirrorError> {
    entry
        .strip_prefix(root)
        .map_err(|_| MirrorError::InvalidRelation {
            path: entry.to_path_buf(),
            root: root.to_path_buf(),
        })
}

/// Map `entry` from under `source_root` to the same relative location under
/// `dest_root`.
///
/// `map(source_root, source_root, dest_root)` is `dest_root` itself.
///
/// # Errors
///
/// Returns [`MirrorError::InvalidRelation`] if `entry` is not under
/// `source_root`.
pub fn map(entry: &Path, source_root: &Path, dest_root: &Path) -> Result<PathBuf, MirrorError> {
    let rel = relative(entry, source_root)?;
    if rel.as_os_str().is_empty() {
        return Ok(dest_root.to_path_buf());
    }
    Ok(dest_root.join(rel))
}
