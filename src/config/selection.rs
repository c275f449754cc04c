//! Well-known configuration locations offered during setup.
use std::path::{Path, PathBuf};

/// A named configuration path relative to the home directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonConfig {
    /// Display name shown in the prompt.
    pub name: &'static str,
    /// Path relative to the home directory.
    pub relative: &'static str,
}

impl CommonConfig {
    /// Absolute path of this config under `home`.
    #[must_use]
    pub fn path(&self, home: &Path) -> PathBuf {
        home.join(self.relative)
    }
}

/// Configurations offered one by one during setup, in prompt order.
pub const COMMON_CONFIGS: &[CommonConfig] = &[
    CommonConfig {
        name: "Bash",
        relative: ".bashrc",
    },
    CommonConfig {
        name: "Zsh",
        relative: ".zshrc",
    },
    CommonConfig {
        name: "Neovim",
        relative: ".config/nvim",
    },
    CommonConfig {
        name: "Kitty",
        relative: ".config/kitty",
    },
    CommonConfig {
        name: "Git",
        relative: ".gitconfig",
    },
    CommonConfig {
        name: "Tmux",
        relative: ".tmux.conf",
    },
];

/// Resolve a user-typed path against `home`.
///
/// `~` and `~/...` expand to the home directory; other relative paths are
/// taken relative to home; absolute paths are kept as typed.
#[must_use]
pub fn expand_user_path(input: &str, home: &Path) -> PathBuf {
    let input = input.trim();
    if input == "~" {
        return home.to_path_buf();
    }
    if let Some(rest) = input.strip_prefix("~/") {
        return home.join(rest);
    }
    let path = Path::new(input);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(path)
    }
}
