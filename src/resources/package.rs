//! Package installation resource.
use std::fmt;
use std::str::FromStr;

use anyhow::Result;

use super::{Applicable, ResourceChange};
use crate::error::ManifestError;
use crate::exec::{self, Executor};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    /// Debian/Ubuntu.
    Apt,
    /// Fedora.
    Dnf,
    /// Older RHEL/CentOS.
    Yum,
    /// openSUSE.
    Zypper,
    /// Arch Linux.
    Pacman,
    /// Homebrew.
    Brew,
}

impl PackageManager {
    /// Order in which managers are probed on `PATH`.
    pub const DETECTION_ORDER: [Self; 6] = [
        Self::Apt,
        Self::Pacman,
        Self::Dnf,
        Self::Yum,
        Self::Zypper,
        Self::Brew,
    ];

    /// Name used in the manifest header and as the executable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
            Self::Zypper => "zypper",
            Self::Pacman => "pacman",
            Self::Brew => "brew",
        }
    }

    /// Build the argv that installs `package`.
    ///
    /// The package name is always a single argument, never interpreted by a
    /// shell.
    #[must_use]
    pub fn install_command(self, package: &str) -> InstallCommand {
        let (program, args): (&str, &[&str]) = match self {
            Self::Apt => ("sudo", &["apt", "install", "-y"]),
            Self::Dnf => ("sudo", &["dnf", "install", "-y"]),
            Self::Yum => ("sudo", &["yum", "install", "-y"]),
            Self::Zypper => ("sudo", &["zypper", "install", "-y"]),
            Self::Pacman => ("sudo", &["pacman", "-S", "--noconfirm"]),
            Self::Brew => ("brew", &["install"]),
        };
        InstallCommand {
            program: program.to_string(),
            args: args
                .iter()
                .map(ToString::to_string)
                .chain(std::iter::once(package.to_string()))
                .collect(),
        }
    }

    /// Return the first supported manager found on `PATH`.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Option<Self> {
        Self::DETECTION_ORDER
            .into_iter()
            .find(|manager| executor.which(manager.name()))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PackageManager {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::DETECTION_ORDER
            .into_iter()
            .find(|manager| manager.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ManifestError::UnsupportedManager(wanted.to_string()))
    }
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Executable to run.
    pub program: String,
    /// Arguments, package name last.
    pub args: Vec<String>,
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&exec::display_command(&self.program, &self.args))
    }
}

/// A system package that can be installed.
pub struct PackageResource<'a> {
    /// Package name as listed in the manifest.
    pub name: String,
    /// Package manager to use.
    pub manager: PackageManager,
    executor: &'a dyn Executor,
}

impl fmt::Debug for PackageResource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageResource")
            .field("name", &self.name)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(name: String, manager: PackageManager, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            manager,
            executor,
        }
    }

    /// Command that installs this package.
    #[must_use]
    pub fn command(&self) -> InstallCommand {
        self.manager.install_command(&self.name)
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        format!("{} (via {})", self.name, self.manager)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let cmd = self.command();
        let code = self.executor.run_inherited(&cmd.program, &cmd.args)?;
        Ok(ResourceChange::from_exit_code(code))
    }
}
