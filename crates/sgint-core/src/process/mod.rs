//! Process execution
//!
//! Every external tool is run through `sh -c`. Spawn failures never surface as
//! errors: they are reported as the [`SPAWN_FAILED`] exit code so callers only
//! ever branch on exit codes.

mod system;
mod terminal;

pub use system::{ElevationConfig, SystemRunner};

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Exit code reported when a process could not be spawned
pub const SPAWN_FAILED: i32 = -1;

/// A shell script and the directory it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    script: String,
    cwd: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            cwd: None,
        }
    }

    /// Run the script from `dir`
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cwd {
            Some(dir) => write!(f, "cd {} && {}", quote(&dir.to_string_lossy()), self.script),
            None => f.write_str(&self.script),
        }
    }
}

/// Combined output and exit code of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellResult {
    pub output: String,
    pub exit_code: i32,
}

impl ShellResult {
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }

    /// Result for a process that never started
    pub fn spawn_failed() -> Self {
        Self::new(String::new(), SPAWN_FAILED)
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs shell commands for the build pipeline
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run and forward combined stdout/stderr to the terminal as it arrives
    async fn run_streaming(&self, command: &ShellCommand) -> i32;

    /// Run and collect combined stdout/stderr
    async fn run_captured(&self, command: &ShellCommand) -> ShellResult;

    /// Run with elevated privileges, streaming output
    async fn run_elevated(&self, command: &ShellCommand) -> i32;

    /// Run with elevated privileges, collecting output
    async fn run_elevated_captured(&self, command: &ShellCommand) -> ShellResult;
}

/// Quote a string for `sh` using single quotes
pub fn quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:+,@%".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
