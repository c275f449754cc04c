//! Dotfiles synchronization engine.
//!
//! Captures configuration files from a home directory into a portable backup
//! tree and restores them on another machine by linking every file back into
//! place, installing the packages named in a manifest, and running
//! post-install scripts.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: repository layout, settings and the package manifest
//! - **[`mirror`]**: path mapping, conflict resolution, link reconciliation and export
//! - **[`resources`]**: idempotent primitives (symlinks, packages, scripts)
//! - **[`tasks`]**: named units of install work wired to resources
//! - **[`commands`]**: top-level subcommands (`setup`, `install`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod mirror;
pub mod prompt;
pub mod resources;
pub mod tasks;
