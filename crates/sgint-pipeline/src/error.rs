//! Error types for the build pipeline

use std::path::PathBuf;
use thiserror::Error;

use sgint_core::{ConfigError, PathError, PresetError, SgintError};

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Engine or driver resolution failed
    #[error(transparent)]
    Path(#[from] PathError),

    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export presets could not be read or written
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// An external tool exited non-zero or could not be spawned
    #[error("Command failed with exit code {exit_code}: {command}")]
    SubprocessFailed { command: String, exit_code: i32 },

    /// A build product the pipeline expected is not on disk
    #[error("Expected artifact not found at {path}")]
    ArtifactMissing { path: PathBuf },

    /// Build tool not installed
    #[error("Required tool '{tool}' not found. {install_hint}")]
    ToolNotFound { tool: String, install_hint: String },

    /// IO error
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error with no file to attribute it to
    #[error("IO error: {0}")]
    UnattributedIo(#[source] std::io::Error),
}

impl PipelineError {
    /// Create a subprocess failure from a command and its exit code
    pub fn subprocess(command: impl ToString, exit_code: i32) -> Self {
        Self::SubprocessFailed {
            command: command.to_string(),
            exit_code,
        }
    }

    /// Create a tool not found error with install hint
    pub fn tool_not_found(tool: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self::ToolNotFound {
            tool: tool.into(),
            install_hint: install_hint.into(),
        }
    }

    /// Attach a path to an IO error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get exit code for CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Path(_) => 2,
            Self::ToolNotFound { .. } => 3,
            Self::Config(_) => 4,
            Self::Preset(_) => 6,
            Self::Io { .. } | Self::UnattributedIo(_) => 7,
            Self::SubprocessFailed { .. } => 10,
            Self::ArtifactMissing { .. } => 13,
        }
    }
}

impl From<SgintError> for PipelineError {
    fn from(err: SgintError) -> Self {
        match err {
            SgintError::Config(e) => Self::Config(e),
            SgintError::Path(e) => Self::Path(e),
            SgintError::Preset(e) => Self::Preset(e),
            SgintError::Io(e) => Self::UnattributedIo(e),
        }
    }
}
