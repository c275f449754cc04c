//! Symlink primitives.
use std::io;
use std::path::{Path, PathBuf};

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns the underlying I/O error if the link cannot be created.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Create a symlink at `link` pointing to `target`.
///
/// Directory targets get a directory symlink, everything else a file symlink.
///
/// # Errors
///
/// Returns the underlying I/O error if the link cannot be created.
#[cfg(windows)]
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Return `true` if `link` is a symlink whose stored target is `target`.
#[must_use]
pub fn points_to(link: &Path, target: &Path) -> bool {
    std::fs::read_link(link).is_ok_and(|existing| paths_equal(&existing, target))
}

/// Return `true` if `a` and `b` resolve to the same existing path.
#[must_use]
pub fn resolves_to(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Compare two paths for equality, handling UNC prefix normalization on Windows.
fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf { dunce::simplified(p).to_path_buf() };
    normalize(a) == normalize(b)
}
