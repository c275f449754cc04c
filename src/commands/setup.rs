//! Command: interactive repository setup.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Layout;
use crate::config::manifest::{PackageManifest, append_packages};
use crate::config::selection::{COMMON_CONFIGS, expand_user_path};
use crate::exec::Executor;
use crate::logging::Log;
use crate::mirror::export;
use crate::prompt::Prompter;
use crate::resources::package::PackageManager;

/// Manager name written when none is given and none is detected.
pub const UNKNOWN_MANAGER: &str = "unknown";

/// Base name of the script written from collected post-install commands.
pub const POST_INSTALL_STEM: &str = "post-install";

/// What to do with an existing manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestChoice {
    /// Rewrite it from scratch.
    Override,
    /// Append more packages.
    Add,
    /// Leave it alone.
    Skip,
}

impl ManifestChoice {
    /// Interpret an answer by its first character: `o` overrides, `a` adds,
    /// anything else (including an empty answer) skips.
    #[must_use]
    pub fn parse(answer: &str) -> Self {
        match answer.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('o') => Self::Override,
            Some('a') => Self::Add,
            _ => Self::Skip,
        }
    }
}

/// Inputs shared by every setup step.
pub struct Setup<'a> {
    /// Repository layout.
    pub layout: &'a Layout,
    /// Home directory configs are exported from.
    pub home: &'a Path,
    /// Output.
    pub log: &'a dyn Log,
    /// Source of answers.
    pub prompter: &'a dyn Prompter,
    /// Used to detect the package manager.
    pub executor: &'a dyn Executor,
}

impl std::fmt::Debug for Setup<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Setup")
            .field("layout", &self.layout)
            .field("home", &self.home)
            .finish_non_exhaustive()
    }
}

/// Run the setup command against the resolved root and home.
///
/// # Errors
///
/// Returns an error if the root or home cannot be resolved, the settings
/// file is invalid, or a step cannot read answers or write its files.
pub fn run(
    global: &GlobalOpts,
    log: &dyn Log,
    prompter: &dyn Prompter,
    executor: &dyn Executor,
) -> Result<()> {
    let root = super::resolve_root(global)?;
    let home = super::resolve_home(global)?;
    let layout = Layout::load(&root)?;
    log.debug(&format!("root: {}", root.display()));
    log.debug(&format!("home: {}", home.display()));

    Setup {
        layout: &layout,
        home: &home,
        log,
        prompter,
        executor,
    }
    .run()
}

impl Setup<'_> {
    /// Run every step in order: manifest, export, post-install commands.
    ///
    /// # Errors
    ///
    /// Returns the first step error.
    pub fn run(&self) -> Result<()> {
        self.log.stage("Package manifest");
        self.manifest()?;

        self.log.stage("Export configs");
        self.export_configs()?;

        self.log.stage("Post-install commands");
        self.post_install()?;

        self.log.info(&format!(
            "'{}' holds post-install commands and other shell scripts run after packages and links are installed",
            self.layout.settings.scripts_dir
        ));
        self.log.success("setup complete");
        Ok(())
    }

    /// Create, override, or extend the package manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if answers cannot be read or the manifest cannot be
    /// written.
    pub fn manifest(&self) -> Result<()> {
        let path = self.layout.manifest_path();

        if path.exists() {
            let answer = self.prompter.input(&format!(
                "{} already exists. (o)verride or (a)dd more packages? (enter to skip)",
                self.layout.settings.manifest
            ))?;
            match ManifestChoice::parse(&answer) {
                ManifestChoice::Override => self.write_new_manifest(&path),
                ManifestChoice::Add => {
                    let packages = self.collect_packages()?;
                    append_packages(&path, &packages)?;
                    self.log.success(&format!(
                        "appended {} package(s) to {}",
                        packages.len(),
                        path.display()
                    ));
                    Ok(())
                }
                ManifestChoice::Skip => {
                    self.log.info("keeping existing manifest");
                    Ok(())
                }
            }
        } else if self.prompter.confirm(
            &format!("Create a new {} file?", self.layout.settings.manifest),
            true,
        )? {
            self.write_new_manifest(&path)
        } else {
            Ok(())
        }
    }

    fn write_new_manifest(&self, path: &Path) -> Result<()> {
        let manager = self.choose_manager()?;
        let mut manifest = PackageManifest::new(manager);
        manifest.packages = self.collect_packages()?;
        manifest.write(path)?;
        self.log.success(&format!(
            "saved {} package(s) to {}",
            manifest.packages.len(),
            path.display()
        ));
        Ok(())
    }

    fn choose_manager(&self) -> Result<String> {
        let typed = self
            .prompter
            .input("Package manager (leave blank to auto-detect)")?;
        let typed = typed.trim();

        if !typed.is_empty() {
            if typed.parse::<PackageManager>().is_err() {
                self.log.warn(&format!(
                    "{typed} is not a supported package manager; install will skip packages"
                ));
            }
            self.log.info(&format!("using package manager: {typed}"));
            return Ok(typed.to_string());
        }

        if let Some(manager) = PackageManager::detect(self.executor) {
            self.log
                .success(&format!("detected package manager: {manager}"));
            Ok(manager.name().to_string())
        } else {
            self.log.warn(&format!(
                "no supported package manager found; writing '{UNKNOWN_MANAGER}'"
            ));
            Ok(UNKNOWN_MANAGER.to_string())
        }
    }

    fn collect_packages(&self) -> Result<Vec<String>> {
        self.prompter
            .collect_until_done("Package name (type 'done' to finish)")
    }

    /// Ask which configs to export and copy them into the backup tree.
    ///
    /// # Errors
    ///
    /// Returns an error if answers cannot be read.  Per-path copy failures
    /// are logged, not returned.
    pub fn export_configs(&self) -> Result<()> {
        if !self
            .prompter
            .confirm("Export configuration files to the dotfiles repository?", true)?
        {
            return Ok(());
        }

        let selected = self.select_configs()?;
        if selected.is_empty() {
            self.log.info("nothing selected");
            return Ok(());
        }

        let backup_dir = self.layout.backup_dir();
        let mut exported = 0usize;
        for report in export(&selected, self.home, &backup_dir) {
            match (&report.result, &report.destination) {
                (Ok(()), Some(dest)) => {
                    exported += 1;
                    self.log.success(&format!(
                        "copied {} -> {}",
                        report.source.display(),
                        dest.display()
                    ));
                }
                (Ok(()), None) => exported += 1,
                (Err(e), _) => self.log.error(&e.to_string()),
            }
        }
        self.log.info(&format!(
            "exported {exported} of {} selected path(s)",
            selected.len()
        ));
        Ok(())
    }

    fn select_configs(&self) -> Result<Vec<PathBuf>> {
        let mut selected = Vec::new();
        for config in COMMON_CONFIGS {
            let path = config.path(self.home);
            let question = format!("Include {} config ({})?", config.name, path.display());
            if self.prompter.confirm(&question, false)? {
                selected.push(path);
            }
        }

        if self.prompter.confirm("Add custom paths?", false)? {
            for answer in self
                .prompter
                .collect_until_done("Path (type 'done' to finish)")?
            {
                let path = expand_user_path(&answer, self.home);
                if path.exists() {
                    selected.push(path);
                } else {
                    self.log
                        .error(&format!("path doesn't exist: {}", path.display()));
                }
            }
        }
        Ok(selected)
    }

    /// Ensure the scripts directory exists and optionally record
    /// post-install commands into an owner-only executable script.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or script cannot be written.
    pub fn post_install(&self) -> Result<()> {
        let dir = self.layout.scripts_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("creating {}", dir.display()))?;

        if !self.prompter.confirm("Add post-install commands?", false)? {
            return Ok(());
        }

        let commands = self
            .prompter
            .collect_until_done("Shell command (type 'done' to finish)")?;
        let path = dir.join(format!(
            "{POST_INSTALL_STEM}.{}",
            self.layout.script_extension()
        ));

        let mut script = String::new();
        for command in &commands {
            script.push_str(command);
            script.push('\n');
        }
        std::fs::write(&path, script).with_context(|| format!("writing {}", path.display()))?;
        set_owner_only_executable(&path)?;

        self.log.success(&format!(
            "saved {} command(s) to {}",
            commands.len(),
            path.display()
        ));
        Ok(())
    }
}

#[cfg(unix)]
fn set_owner_only_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .with_context(|| format!("setting permissions on {}", path.display()))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn set_owner_only_executable(_path: &Path) -> Result<()> {
    Ok(())
}
