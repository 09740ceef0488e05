//! Settings types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults;

/// Project-level settings read from `sgint.toml` / `sgint.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Project name; the driver is named `<project_name>Driver`
    pub project_name: Option<String>,

    /// Engine location
    pub engine: EngineSettings,

    /// Driver build settings
    pub build: BuildSettings,

    /// Headless export settings
    pub export: ExportSettings,
}

/// Where to look for the Godot application bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Explicit path to `Godot.app`
    pub path: Option<PathBuf>,

    /// Directories searched in order for `Godot.app`
    pub search_paths: Vec<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            path: None,
            search_paths: defaults::engine_search_paths(),
        }
    }
}

/// Driver build settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Build mode, `debug` or `release`
    pub mode: String,

    /// SwiftPM target triples whose build products are staged for desktop
    pub desktop_targets: Vec<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            mode: defaults::DEFAULT_BUILD_MODE.to_string(),
            desktop_targets: vec![defaults::DEFAULT_DESKTOP_TARGET.to_string()],
        }
    }
}

/// Export preset names as configured in `export_presets.cfg`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Preset used for the macOS installer package
    pub macos_preset: String,

    /// Preset used for iOS devices
    pub ios_preset: String,

    /// Preset used for the iOS simulator
    pub ios_simulator_preset: String,

    /// Rendering method written to `project.godot` while exporting for the simulator
    pub simulator_rendering_method: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            macos_preset: defaults::DEFAULT_MACOS_PRESET.to_string(),
            ios_preset: defaults::DEFAULT_IOS_PRESET.to_string(),
            ios_simulator_preset: defaults::DEFAULT_IOS_SIMULATOR_PRESET.to_string(),
            simulator_rendering_method: defaults::DEFAULT_SIMULATOR_RENDERING_METHOD.to_string(),
        }
    }
}
