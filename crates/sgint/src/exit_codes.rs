//! Exit codes for the CLI

#![allow(dead_code)]

use sgint_core::{ConfigError, PathError, PresetError, SgintError};
use sgint_pipeline::PipelineError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Project, driver or engine could not be resolved
pub const PATH_ERROR: i32 = 2;

/// Required build tool missing
pub const TOOL_ERROR: i32 = 3;

/// Settings error
pub const CONFIG_ERROR: i32 = 4;

/// Export presets could not be edited
pub const PRESET_ERROR: i32 = 6;

/// Filesystem error
pub const IO_ERROR: i32 = 7;

/// Pick the exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        return e.exit_code();
    }
    if let Some(e) = err.downcast_ref::<SgintError>() {
        return match e {
            SgintError::Config(_) => CONFIG_ERROR,
            SgintError::Path(_) => PATH_ERROR,
            SgintError::Preset(_) => PRESET_ERROR,
            SgintError::Io(_) => IO_ERROR,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some() {
        return CONFIG_ERROR;
    }
    if err.downcast_ref::<PathError>().is_some() {
        return PATH_ERROR;
    }
    if err.downcast_ref::<PresetError>().is_some() {
        return PRESET_ERROR;
    }
    if err.downcast_ref::<std::io::Error>().is_some() {
        return IO_ERROR;
    }
    ERROR
}
