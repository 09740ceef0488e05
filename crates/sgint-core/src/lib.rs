//! sgint Core - Core library for building Swift Godot drivers
//!
//! This crate provides settings, error handling, project path resolution,
//! export preset editing and process execution for the sgint tool.

pub mod config;
pub mod error;
pub mod paths;
pub mod presets;
pub mod process;
pub mod templates;

pub use config::Settings;
pub use error::{ConfigError, PathError, PresetError, Result, SgintError};
pub use paths::{resolve_engine, resolve_project_name, PathLayout};
pub use presets::{stamp_build_number_file, PresetBlock, PresetDocument, StampedPreset};
pub use process::{
    ElevationConfig, ProcessRunner, ShellCommand, ShellResult, SystemRunner, SPAWN_FAILED,
};
