//! Settings loading

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::settings_file_names;
use super::types::Settings;
use super::validation::validate_settings;

/// Load settings from a file
pub fn load_settings(path: &Path) -> Result<Settings> {
    let format = if path
        .extension()
        .is_some_and(|e| e == "yaml" || e == "yml")
    {
        "YAML"
    } else {
        "TOML"
    };
    info!(path = %path.display(), format, "loading settings");

    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

    let settings: Settings = if format == "TOML" {
        toml::from_str(&content).map_err(ConfigError::TomlError)?
    } else {
        serde_yaml::from_str(&content).map_err(ConfigError::YamlError)?
    };

    validate_settings(&settings)?;
    debug!(path = %path.display(), "settings loaded and validated");
    Ok(settings)
}

/// Find a settings file in the directory or its parents.
///
/// The first match wins. Parents are walked until the filesystem root.
pub fn find_settings(start_dir: &Path) -> Option<PathBuf> {
    debug!(start_dir = %start_dir.display(), "searching for settings file");
    let mut current = start_dir.to_path_buf();

    loop {
        for name in settings_file_names() {
            let candidate = current.join(name);
            if candidate.is_file() {
                info!(path = %candidate.display(), "found settings file");
                return Some(candidate);
            }
        }

        if !current.pop() {
            break;
        }
    }

    debug!("no settings file found");
    None
}

/// Load settings, falling back to defaults when no file exists.
///
/// A settings file that exists but fails to parse or validate is an error.
pub fn load_settings_or_default(dir: &Path) -> Result<(Settings, Option<PathBuf>)> {
    match find_settings(dir) {
        Some(path) => {
            let settings = load_settings(&path)?;
            Ok((settings, Some(path)))
        }
        None => {
            debug!(dir = %dir.display(), "no settings found, using defaults");
            Ok((Settings::default(), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_settings_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sgint.toml");
        std::fs::write(&path, "[build]\nmode = \"release\"").unwrap();

        assert_eq!(find_settings(temp.path()), Some(path));
    }

    #[test]
    fn test_find_settings_walks_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sgint.toml");
        std::fs::write(&path, "").unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_settings(&nested), Some(path));
    }

    #[test]
    fn test_load_settings_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sgint.toml");
        std::fs::write(
            &path,
            "project_name = \"Space\"\n\n[build]\nmode = \"release\"\n\n[export]\nios_preset = \"iPhone\"\n",
        )
        .unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.project_name.as_deref(), Some("Space"));
        assert_eq!(settings.build.mode, "release");
        assert_eq!(settings.export.ios_preset, "iPhone");
        assert_eq!(settings.export.macos_preset, "macOS (App Store)");
    }

    #[test]
    fn test_load_settings_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("sgint.yaml");
        std::fs::write(&path, "engine:\n  path: /opt/Godot.app\nbuild:\n  mode: debug\n").unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(
            settings.engine.path,
            Some(PathBuf::from("/opt/Godot.app"))
        );
        assert_eq!(settings.build.mode, "debug");
    }

    #[test]
    fn test_load_settings_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let (settings, path) = load_settings_or_default(temp.path()).unwrap();
        assert!(path.is_none());
        assert_eq!(settings.build.mode, "debug");
        assert_eq!(settings.export.ios_simulator_preset, "iOS_Simulator");
    }

    #[test]
    fn test_invalid_settings_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("sgint.toml"), "[build]\nmode = \"fast\"\n").unwrap();

        assert!(load_settings_or_default(temp.path()).is_err());
    }
}
