//! Copy selected home paths into the backup tree.
use std::path::{Path, PathBuf};

use super::path_map;
use crate::error::MirrorError;
use crate::resources::helpers::fs::{copy_into_place, ensure_parent_dir};

/// Result of exporting one selected path.
#[derive(Debug)]
pub struct ExportReport {
    /// Selected path under home.
    pub source: PathBuf,
    /// Location in the backup tree, when the path could be mapped.
    pub destination: Option<PathBuf>,
    /// Outcome of the copy.
    pub result: Result<(), MirrorError>,
}

impl ExportReport {
    /// `true` if the path was copied.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Export each of `selected` from `home_root` into `backup_root`, in order.
///
/// Each path is copied in full (symlinks followed) and replaces whatever the
/// backup tree held at that location.  A failing path is reported and the
/// remaining paths are still exported.
#[must_use]
pub fn export(selected: &[PathBuf], home_root: &Path, backup_root: &Path) -> Vec<ExportReport> {
    selected
        .iter()
        .map(|source| {
            let (destination, result) = if source.exists() {
                match path_map::map(source, home_root, backup_root) {
                    Ok(dest) => {
                        let result = export_one(source, &dest, backup_root);
                        (Some(dest), result)
                    }
                    Err(e) => (None, Err(e)),
                }
            } else {
                let missing = MirrorError::NotFound {
                    path: source.clone(),
                };
                (None, Err(missing))
            };
            ExportReport {
                source: source.clone(),
                destination,
                result,
            }
        })
        .collect()
}

fn export_one(source: &Path, dest: &Path, backup_root: &Path) -> Result<(), MirrorError> {
    // Copying an ancestor of the backup tree into it would recurse forever.
    if backup_root.starts_with(source) {
        return Err(MirrorError::InvalidRelation {
            path: source.to_path_buf(),
            root: backup_root.to_path_buf(),
        });
    }
    ensure_parent_dir(dest)?;
    copy_into_place(source, dest)
}
