//! Default settings values

use std::path::PathBuf;

/// Default settings file name (TOML)
pub const DEFAULT_SETTINGS_TOML: &str = "sgint.toml";

/// Default settings file name (YAML)
pub const DEFAULT_SETTINGS_YAML: &str = "sgint.yaml";

/// Project name used when scaffolding without `--project-name`
pub const DEFAULT_PROJECT_NAME: &str = "NewProject";

pub const DEFAULT_BUILD_MODE: &str = "debug";

pub const DEFAULT_DESKTOP_TARGET: &str = "arm64-apple-macosx";

pub const DEFAULT_MACOS_PRESET: &str = "macOS (App Store)";

pub const DEFAULT_IOS_PRESET: &str = "iOS";

pub const DEFAULT_IOS_SIMULATOR_PRESET: &str = "iOS_Simulator";

/// The iOS simulator crashes with the `mobile` and `forward_plus` renderers
pub const DEFAULT_SIMULATOR_RENDERING_METHOD: &str = "gl_compatibility";

/// Get list of settings file names to search for
pub fn settings_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_SETTINGS_TOML,
        DEFAULT_SETTINGS_YAML,
        ".sgint.toml",
        ".sgint.yaml",
    ]
}

/// System and user application directories, in search order
pub fn engine_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/Applications")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("Applications"));
    }
    paths
}

/// Settings template written by `sgint init --write-settings`
pub const DEFAULT_SETTINGS_TEMPLATE: &str = r#"# sgint settings

[engine]
# path = "/Applications/Godot.app"

[build]
mode = "debug"
desktop_targets = ["arm64-apple-macosx"]

[export]
macos_preset = "macOS (App Store)"
ios_preset = "iOS"
ios_simulator_preset = "iOS_Simulator"
simulator_rendering_method = "gl_compatibility"
"#;
