//! Build tool prerequisite checks

use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::platform::PlatformKind;

/// Outcome of checking the tools a platform needs
#[derive(Debug, Clone)]
pub struct PrerequisiteStatus {
    pub satisfied: bool,
    pub tools: Vec<ToolStatus>,
}

impl PrerequisiteStatus {
    pub fn ok() -> Self {
        Self {
            satisfied: true,
            tools: Vec::new(),
        }
    }

    pub fn with_tool(mut self, tool: ToolStatus) -> Self {
        if !tool.available {
            self.satisfied = false;
        }
        self.tools.push(tool);
        self
    }

    /// Fail on the first missing tool
    pub fn into_result(self) -> Result<Self> {
        match self.tools.iter().find(|tool| !tool.available) {
            Some(tool) => Err(PipelineError::tool_not_found(
                &tool.name,
                &tool.install_hint,
            )),
            None => Ok(self),
        }
    }
}

/// Status of a required tool
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub name: String,
    pub available: bool,
    pub path: Option<PathBuf>,
    pub install_hint: String,
}

impl ToolStatus {
    pub fn found(name: impl Into<String>, path: PathBuf) -> Self {
        Self {
            name: name.into(),
            available: true,
            path: Some(path),
            install_hint: String::new(),
        }
    }

    pub fn missing(name: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: false,
            path: None,
            install_hint: install_hint.into(),
        }
    }
}

/// Check the build tool for `platform` on `PATH`
pub fn check_prerequisites(platform: PlatformKind) -> PrerequisiteStatus {
    check_prerequisites_in(platform, std::env::var_os("PATH"))
}

/// Check the build tool for `platform` in an explicit search path
pub fn check_prerequisites_in(platform: PlatformKind, search_path: Option<OsString>) -> PrerequisiteStatus {
    let tool = platform.build_tool();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));

    let status = match which::which_in(tool, search_path, cwd) {
        Ok(path) => {
            debug!(tool, path = %path.display(), "found build tool");
            ToolStatus::found(tool, path)
        }
        Err(_) => {
            debug!(tool, "build tool not found");
            ToolStatus::missing(tool, platform.install_hint())
        }
    };

    PrerequisiteStatus::ok().with_tool(status)
}
