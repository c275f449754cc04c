//! Walk the backup tree and bring the home directory in line with it.
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::conflict::{self, Action, EntryKind, LinkEntry};
use super::path_map;
use crate::error::MirrorError;

/// Result of handling one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action was carried out (or there was nothing to do).
    Applied,
    /// Test mode: the action was decided but not carried out.
    Planned,
    /// The entry could not be handled; the walk continued.
    Failed(String),
}

/// Report for one backup tree entry.
#[derive(Debug, Clone)]
pub struct LinkReport {
    /// The backup tree entry.
    pub entry: LinkEntry,
    /// Mapped location under home.
    pub destination: PathBuf,
    /// Chosen action; `None` when the destination could not be inspected.
    pub action: Option<Action>,
    /// What happened.
    pub outcome: Outcome,
}

impl LinkReport {
    /// `true` when the entry required no change.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.action == Some(Action::AlreadyLinked)
    }
}

/// Mirror every entry of `backup_root` into `home_root`.
///
/// Entries are visited pre-order with the root excluded.  Directories become
/// real directories; files become symlinks to the backup entry, displacing
/// foreign content to a `.bak` sibling.  In `test_mode` nothing is modified
/// and every report is [`Outcome::Planned`].
///
/// Entries unreadable because of permissions are skipped silently.  Symlinks
/// and special files inside the backup tree are skipped.
///
/// # Errors
///
/// Returns [`MirrorError::NotFound`] when `backup_root` does not exist.
/// Per-entry failures are captured in the reports instead.
pub fn reconcile(
    backup_root: &Path,
    home_root: &Path,
    test_mode: bool,
) -> Result<Vec<LinkReport>, MirrorError> {
    let root =
        dunce::canonicalize(backup_root).map_err(|e| MirrorError::from_io(backup_root, e))?;

    let mut reports = Vec::new();
    for item in WalkDir::new(&root).min_depth(1).sort_by_file_name() {
        let dir_entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let err = walk_error(err);
                if !err.is_denied() {
                    tracing::debug!("skipping unreadable backup entry: {err}");
                }
                continue;
            }
        };

        let file_type = dir_entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            tracing::debug!(
                "skipping non-regular backup entry: {}",
                dir_entry.path().display()
            );
            continue;
        };

        let source = dir_entry.into_path();
        let (relative, destination) = match locate(&source, &root, home_root) {
            Ok(located) => located,
            Err(e) => {
                tracing::debug!("skipping backup entry: {e}");
                continue;
            }
        };

        let entry = LinkEntry {
            source,
            relative,
            kind,
        };
        reports.push(reconcile_entry(entry, destination, test_mode));
    }

    Ok(reports)
}

/// Classify a traversal error the way other filesystem errors are.
fn walk_error(err: walkdir::Error) -> MirrorError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let message = err.to_string();
    match err.into_io_error() {
        Some(io) => MirrorError::from_io(&path, io),
        None => MirrorError::Io {
            path,
            source: std::io::Error::other(message),
        },
    }
}

fn locate(source: &Path, root: &Path, home_root: &Path) -> Result<(PathBuf, PathBuf), MirrorError> {
    let relative = path_map::relative(source, root)?.to_path_buf();
    let destination = path_map::map(source, root, home_root)?;
    Ok((relative, destination))
}

fn reconcile_entry(entry: LinkEntry, destination: PathBuf, test_mode: bool) -> LinkReport {
    let state = match conflict::observe(&destination, &entry.source) {
        Ok(state) => state,
        Err(e) => {
            return LinkReport {
                entry,
                destination,
                action: None,
                outcome: Outcome::Failed(e.to_string()),
            };
        }
    };

    let action = conflict::resolve(entry.kind, state);
    let outcome = if test_mode {
        Outcome::Planned
    } else {
        match conflict::apply(action, &entry, &destination) {
            Ok(()) => Outcome::Applied,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    };

    LinkReport {
        entry,
        destination,
        action: Some(action),
        outcome,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::symlink;

    struct Fixture {
        _dir: tempfile::TempDir,
        backup: PathBuf,
        home: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let backup = dunce::canonicalize(dir.path()).unwrap().join("backup");
        let home = dunce::canonicalize(dir.path()).unwrap().join("home");
        std::fs::create_dir_all(&backup).unwrap();
        std::fs::create_dir_all(&home).unwrap();
        Fixture {
            _dir: dir,
            backup,
            home,
        }
    }

    fn write(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn count_backups(dir: &Path) -> usize {
        WalkDir::new(dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.path().extension().is_some_and(|x| x == "bak"))
            .count()
    }

    #[test]
    fn missing_backup_root_is_not_found() {
        let fx = fixture();
        let err = reconcile(&fx.backup.join("absent"), &fx.home, false).unwrap_err();
        assert!(matches!(err, MirrorError::NotFound { .. }));
    }

    #[test]
    fn walk_is_pre_order_and_excludes_root() {
        let fx = fixture();
        write(&fx.backup.join(".config/kitty/kitty.conf"), "k");
        write(&fx.backup.join(".bashrc"), "b");

        let reports = reconcile(&fx.backup, &fx.home, true).unwrap();
        let relatives: Vec<_> = reports.iter().map(|r| r.entry.relative.clone()).collect();

        assert_eq!(
            relatives,
            vec![
                PathBuf::from(".bashrc"),
                PathBuf::from(".config"),
                PathBuf::from(".config/kitty"),
                PathBuf::from(".config/kitty/kitty.conf"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn foreign_file_is_backed_up_and_linked() {
        let fx = fixture();
        write(&fx.backup.join(".bashrc"), "managed");
        write(&fx.home.join(".bashrc"), "original");

        let reports = reconcile(&fx.backup, &fx.home, false).unwrap();

        assert_eq!(reports[0].action, Some(Action::BackupThenLink));
        assert_eq!(reports[0].outcome, Outcome::Applied);
        assert!(symlink::points_to(
            &fx.home.join(".bashrc"),
            &fx.backup.join(".bashrc")
        ));
        assert_eq!(
            std::fs::read_to_string(fx.home.join(".bashrc.bak")).unwrap(),
            "original"
        );
    }

    #[cfg(unix)]
    #[test]
    fn existing_directory_stays_real_with_files_linked() {
        let fx = fixture();
        write(&fx.backup.join(".config/nvim/init.lua"), "lua");
        write(&fx.backup.join(".config/nvim/lua/plugins.lua"), "plugins");
        write(&fx.home.join(".config/nvim/local.lua"), "untracked");

        reconcile(&fx.backup, &fx.home, false).unwrap();

        let nvim = fx.home.join(".config/nvim");
        let meta = std::fs::symlink_metadata(&nvim).unwrap();
        assert!(meta.is_dir() && !meta.is_symlink());
        assert!(nvim.join("local.lua").exists(), "untracked file survives");
        assert!(symlink::points_to(
            &nvim.join("init.lua"),
            &fx.backup.join(".config/nvim/init.lua")
        ));
        assert!(symlink::points_to(
            &nvim.join("lua/plugins.lua"),
            &fx.backup.join(".config/nvim/lua/plugins.lua")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn second_run_changes_nothing() {
        let fx = fixture();
        write(&fx.backup.join(".bashrc"), "managed");
        write(&fx.backup.join(".config/git/config"), "git");
        write(&fx.home.join(".bashrc"), "original");
        write(&fx.home.join(".config/git/config"), "original git");

        reconcile(&fx.backup, &fx.home, false).unwrap();
        let backups_after_first = count_backups(&fx.home);
        let target_before = std::fs::read_link(fx.home.join(".bashrc")).unwrap();

        let second = reconcile(&fx.backup, &fx.home, false).unwrap();

        assert!(second.iter().all(LinkReport::is_unchanged), "{second:?}");
        assert_eq!(count_backups(&fx.home), backups_after_first);
        assert_eq!(
            std::fs::read_link(fx.home.join(".bashrc")).unwrap(),
            target_before
        );
    }

    #[test]
    fn test_mode_plans_without_mutation() {
        let fx = fixture();
        write(&fx.backup.join(".config/kitty/kitty.conf"), "k");
        write(&fx.backup.join(".bashrc"), "managed");
        write(&fx.home.join(".bashrc"), "original");

        let reports = reconcile(&fx.backup, &fx.home, true).unwrap();

        assert!(reports.iter().all(|r| r.outcome == Outcome::Planned));
        let bashrc = reports
            .iter()
            .find(|r| r.entry.relative == Path::new(".bashrc"))
            .unwrap();
        assert_eq!(bashrc.action, Some(Action::BackupThenLink));
        assert_eq!(
            std::fs::read_to_string(fx.home.join(".bashrc")).unwrap(),
            "original"
        );
        assert!(!fx.home.join(".config").exists());
        assert!(!fx.home.join(".bashrc.bak").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_inside_backup_tree_are_skipped() {
        let fx = fixture();
        write(&fx.backup.join("real"), "r");
        std::os::unix::fs::symlink(fx.backup.join("real"), fx.backup.join("alias")).unwrap();

        let reports = reconcile(&fx.backup, &fx.home, false).unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].entry.relative, PathBuf::from("real"));
        assert!(fx.home.join("alias").symlink_metadata().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn failure_is_reported_and_walk_continues() {
        let fx = fixture();
        write(&fx.backup.join("blocked/file"), "x");
        write(&fx.backup.join("zz_after"), "y");
        // A regular file where a directory is expected: children cannot be placed.
        write(&fx.home.join("blocked"), "not a directory");

        let reports = reconcile(&fx.backup, &fx.home, false).unwrap();

        let child = reports
            .iter()
            .find(|r| r.entry.relative == Path::new("blocked/file"))
            .unwrap();
        assert!(matches!(child.outcome, Outcome::Failed(_)), "{child:?}");
        assert!(symlink::points_to(
            &fx.home.join("zz_after"),
            &fx.backup.join("zz_after")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn created_links_are_absolute() {
        let fx = fixture();
        write(&fx.backup.join(".tmux.conf"), "t");

        reconcile(&fx.backup, &fx.home, false).unwrap();

        let target = std::fs::read_link(fx.home.join(".tmux.conf")).unwrap();
        assert!(target.is_absolute());
    }

    #[test]
    fn walk_errors_are_classified() {
        let fx = fixture();
        let err = WalkDir::new(fx.home.join("missing"))
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();

        let err = walk_error(err);

        assert!(matches!(err, MirrorError::NotFound { .. }), "{err}");
        assert!(!err.is_denied());
    }

    #[cfg(unix)]
    #[test]
    fn bak_named_entry_keeps_foreign_content() {
        let fx = fixture();
        write(&fx.backup.join("notes.bak"), "managed");
        write(&fx.home.join("notes.bak"), "precious foreign");

        let reports = reconcile(&fx.backup, &fx.home, false).unwrap();

        assert_eq!(reports[0].outcome, Outcome::Applied);
        assert!(symlink::points_to(
            &fx.home.join("notes.bak"),
            &fx.backup.join("notes.bak")
        ));
        assert_eq!(
            std::fs::read_to_string(fx.home.join("notes.bak.bak")).unwrap(),
            "precious foreign"
        );
    }

    #[test]
    fn directory_at_backup_path_fails_entry_and_survives() {
        let fx = fixture();
        write(&fx.backup.join(".config/app.conf"), "managed");
        write(&fx.home.join(".config/app.conf"), "mine");
        write(&fx.home.join(".config/app.bak/data/important"), "keep");

        let reports = reconcile(&fx.backup, &fx.home, false).unwrap();

        let conf = reports
            .iter()
            .find(|r| r.entry.relative == Path::new(".config/app.conf"))
            .unwrap();
        assert_eq!(conf.action, Some(Action::BackupThenLink));
        assert!(matches!(conf.outcome, Outcome::Failed(_)), "{conf:?}");
        assert_eq!(
            std::fs::read_to_string(fx.home.join(".config/app.conf")).unwrap(),
            "mine"
        );
        assert_eq!(
            std::fs::read_to_string(fx.home.join(".config/app.bak/data/important")).unwrap(),
            "keep"
        );
    }
}
