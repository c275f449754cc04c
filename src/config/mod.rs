//! Dotfiles repository layout and on-disk configuration.
pub mod manifest;
pub mod selection;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional settings file in the dotfiles root.
pub const SETTINGS_FILE: &str = "dotsync.toml";

/// Layout overrides read from [`SETTINGS_FILE`].
///
/// Every field is optional in the file; omitted fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Backup tree directory, relative to the dotfiles root.
    pub backup_dir: String,
    /// Post-install scripts directory, relative to the dotfiles root.
    pub scripts_dir: String,
    /// Package manifest file name, relative to the dotfiles root.
    pub manifest: String,
    /// Extension (without the dot) of files run from the scripts directory.
    pub script_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backup_dir: "config-backup".to_string(),
            scripts_dir: "scripts".to_string(),
            manifest: ".packages".to_string(),
            script_extension: "sh".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML settings: {}", path.display()))
    }
}

/// Resolved locations inside a dotfiles repository.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Root directory of the dotfiles repository.
    pub root: PathBuf,
    /// Settings the paths are derived from.
    pub settings: Settings,
}

impl Layout {
    /// Build a layout for `root`, reading [`SETTINGS_FILE`] if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is present but invalid.
    pub fn load(root: &Path) -> Result<Self> {
        let settings = Settings::load(&root.join(SETTINGS_FILE))?;
        Ok(Self {
            root: root.to_path_buf(),
            settings,
        })
    }

    /// Build a layout for `root` with default settings.
    #[must_use]
    pub fn with_defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            settings: Settings::default(),
        }
    }

    /// Backup tree directory.
    #[must_use]
    pub fn backup_dir(&self) -> PathBuf {
        self.root.join(&self.settings.backup_dir)
    }

    /// Post-install scripts directory.
    #[must_use]
    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(&self.settings.scripts_dir)
    }

    /// Package manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.settings.manifest)
    }

    /// Extension of runnable scripts.
    #[must_use]
    pub fn script_extension(&self) -> &str {
        &self.settings.script_extension
    }
}
