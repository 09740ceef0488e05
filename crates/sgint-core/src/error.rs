//! Error types for sgint

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using SgintError
pub type Result<T> = std::result::Result<T, SgintError>;

/// Main error type for core sgint operations
#[derive(Debug, Error)]
pub enum SgintError {
    /// Settings-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Path and project resolution errors
    #[error(transparent)]
    Path(#[from] PathError),

    /// Export preset editing errors
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid settings value
    #[error("Invalid settings: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading settings: {0}")]
    Io(#[from] std::io::Error),
}

/// Path and project resolution errors
#[derive(Debug, Error)]
pub enum PathError {
    /// An explicitly given engine path does not contain the engine executable
    #[error("Godot executable not found in {0}")]
    PathNotFound(PathBuf),

    /// Searched every engine location without a match
    #[error("Godot not found. Searched: {searched}. Use --godot-path to point at Godot.app")]
    EngineNotFound { searched: String },

    /// No driver package in the working directory
    #[error("No driver found in {0}. Run `sgint init` or pass --project-name")]
    DriverNotFound(PathBuf),

    /// More than one driver package in the working directory
    #[error("Multiple drivers found: {candidates:?}. Pass --project-name to pick one")]
    DriverAmbiguous { candidates: Vec<String> },

    /// IO error while listing the working directory
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Export preset editing errors
#[derive(Debug, Error)]
pub enum PresetError {
    /// Preset file is missing
    #[error("Export presets not found at {0}")]
    FileNotFound(PathBuf),

    /// Failed to read or write the preset file
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
