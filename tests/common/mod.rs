// Shared helpers for integration tests.
//
// Provides a temporary dotfiles root plus a separate temporary home, and
// scripted stand-ins for the terminal and for external processes.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use dotsync::cli::GlobalOpts;
use dotsync::exec::Executor;
use dotsync::prompt::Prompter;

/// An isolated dotfiles root and home directory, each backed by a
/// [`tempfile::TempDir`].
pub struct IntegrationTestContext {
    /// Dotfiles repository root.
    pub root: tempfile::TempDir,
    /// Home directory links are created in and configs exported from.
    pub home: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create an empty root and an empty home.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create root dir"),
            home: tempfile::tempdir().expect("create home dir"),
        }
    }

    /// Path to the repository root.
    pub fn root_path(&self) -> &Path {
        self.root.path()
    }

    /// Path to the home directory.
    pub fn home_path(&self) -> &Path {
        self.home.path()
    }

    /// Path to the default backup tree.
    pub fn backup_path(&self) -> PathBuf {
        self.root.path().join("config-backup")
    }

    /// Global options pointing at this root and home.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            root: Some(self.root.path().to_path_buf()),
            home: Some(self.home.path().to_path_buf()),
        }
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context with an empty root and home.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `relative` inside the backup tree.
    pub fn with_backup_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.backup_path().join(relative), content);
        self
    }

    /// Write `content` to `relative` inside the home directory.
    pub fn with_home_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.home.path().join(relative), content);
        self
    }

    /// Write the package manifest.
    pub fn with_manifest(self, content: &str) -> Self {
        write_file(&self.ctx.root.path().join(".packages"), content);
        self
    }

    /// Write a script into the scripts directory.
    pub fn with_script(self, name: &str, content: &str) -> Self {
        write_file(&self.ctx.root.path().join("scripts").join(name), content);
        self
    }

    /// Finish building and return the configured context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// [`Prompter`] answering from fixed queues.
#[derive(Default)]
pub struct ScriptedPrompter {
    confirms: RefCell<VecDeque<bool>>,
    inputs: RefCell<VecDeque<String>>,
}

impl ScriptedPrompter {
    /// Queue yes/no answers and text answers, consumed in order.
    pub fn new(confirms: &[bool], inputs: &[&str]) -> Self {
        Self {
            confirms: RefCell::new(confirms.iter().copied().collect()),
            inputs: RefCell::new(inputs.iter().map(ToString::to_string).collect()),
        }
    }

    /// True when every queued answer was used.
    pub fn exhausted(&self) -> bool {
        self.confirms.borrow().is_empty() && self.inputs.borrow().is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, prompt: &str, _default: bool) -> Result<bool> {
        self.confirms
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no answer queued for: {prompt}"))
    }

    fn input(&self, prompt: &str) -> Result<String> {
        self.inputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("no answer queued for: {prompt}"))
    }
}

/// [`Executor`] that records commands and reports a fixed set of programs
/// as installed.  Every command exits 0.
#[derive(Default)]
pub struct FakeExecutor {
    available: Vec<String>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeExecutor {
    /// Report `programs` as present on `PATH`.
    pub fn with_available(programs: &[&str]) -> Self {
        Self {
            available: programs.iter().map(ToString::to_string).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Commands run so far, program first.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Executor for FakeExecutor {
    fn run_inherited(&self, program: &str, args: &[String]) -> Result<Option<i32>> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().cloned());
        self.calls.lock().expect("calls lock").push(call);
        Ok(Some(0))
    }

    fn which(&self, program: &str) -> bool {
        self.available.iter().any(|p| p == program)
    }
}
