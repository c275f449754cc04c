//! Package manifest: a header naming the package manager followed by one
//! package per line.
//!
//! ```text
//! Package Manager: apt
//! vim
//! git
//! ```
//!
//! Blank lines and a literal `done` line are ignored wherever they appear.
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use crate::error::ManifestError;

/// Prefix of the manifest header line.
pub const HEADER_PREFIX: &str = "Package Manager:";

/// Terminator accepted (and skipped) inside the package list.
pub const DONE_MARKER: &str = "done";

/// Parsed package manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManifest {
    /// Package manager name as written in the header.
    pub manager: String,
    /// Package names, in file order; duplicates are kept.
    pub packages: Vec<String>,
}

impl PackageManifest {
    /// Create a manifest with no packages.
    #[must_use]
    pub fn new(manager: impl Into<String>) -> Self {
        Self {
            manager: manager.into(),
            packages: Vec::new(),
        }
    }

    /// Parse manifest text.
    ///
    /// Lines before the header are ignored.  The manager name is the trimmed
    /// text following `Package Manager:` on the header line.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MissingManifestHeader`] if no header line is
    /// present.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut lines = text.lines();

        let manager = lines
            .by_ref()
            .find_map(|line| {
                line.split_once(HEADER_PREFIX)
                    .map(|(_, name)| name.trim().to_string())
            })
            .ok_or(ManifestError::MissingManifestHeader)?;

        let packages = lines
            .map(str::trim)
            .filter(|line| is_package_line(line))
            .map(String::from)
            .collect();

        Ok(Self { manager, packages })
    }

    /// Read and parse the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be read, or
    /// [`ManifestError::MissingManifestHeader`] if it has no header.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Render the manifest as text: the header followed by one package per line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{HEADER_PREFIX} {}\n", self.manager);
        for package in &self.packages {
            let _ = writeln!(out, "{package}");
        }
        out
    }

    /// Write the manifest to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Io`] if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        std::fs::write(path, self.render()).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Append package names to an existing manifest file, one per line.
///
/// Blank names and the `done` marker are dropped.  The header is left
/// untouched.
///
/// # Errors
///
/// Returns [`ManifestError::Io`] if the file cannot be opened for appending.
pub fn append_packages(path: &Path, packages: &[String]) -> Result<(), ManifestError> {
    let io_err = |source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    };

    let needs_newline = std::fs::read(path)
        .map(|bytes| bytes.last().is_some_and(|b| *b != b'\n'))
        .map_err(io_err)?;

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(io_err)?;

    let mut out = String::new();
    if needs_newline {
        out.push('\n');
    }
    for package in packages.iter().map(|p| p.trim()).filter(|p| is_package_line(p)) {
        let _ = writeln!(out, "{package}");
    }
    file.write_all(out.as_bytes()).map_err(io_err)
}

fn is_package_line(line: &str) -> bool {
    !line.is_empty() && line != DONE_MARKER
}
