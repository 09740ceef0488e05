//! Invocation context
//!
//! An [`Invocation`] is the settings file merged with command-line overrides.
//! It is built once per command and passed explicitly to everything that needs
//! it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sgint_core::config::{self, Settings};
use sgint_core::{resolve_engine, resolve_project_name, PathError, PathLayout};

use crate::platform::{BuildMode, PlatformKind};

/// Export preset names per platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPresets {
    pub macos: String,
    pub ios: String,
    pub ios_simulator: String,
}

impl ExportPresets {
    pub fn for_platform(&self, platform: PlatformKind) -> &str {
        match platform {
            PlatformKind::Desktop => &self.macos,
            PlatformKind::MobileDevice => &self.ios,
            PlatformKind::MobileSimulator => &self.ios_simulator,
        }
    }
}

impl Default for ExportPresets {
    fn default() -> Self {
        Self {
            macos: config::DEFAULT_MACOS_PRESET.to_string(),
            ios: config::DEFAULT_IOS_PRESET.to_string(),
            ios_simulator: config::DEFAULT_IOS_SIMULATOR_PRESET.to_string(),
        }
    }
}

/// Everything one command needs to know
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Godot project root
    pub working_dir: PathBuf,

    /// Explicit project name; inferred from the driver directory otherwise
    pub project_name: Option<String>,

    /// Explicit `Godot.app` bundle
    pub godot_path: Option<PathBuf>,

    /// Directories searched for `Godot.app`
    pub engine_search_paths: Vec<PathBuf>,

    /// Build configuration
    pub mode: BuildMode,

    /// SwiftPM target triples whose products are staged for desktop
    pub desktop_targets: Vec<String>,

    /// Export preset names
    pub presets: ExportPresets,

    /// Renderer forced while exporting for the simulator
    pub simulator_rendering_method: String,

    /// Build number stamped into the export presets before building
    pub build_number: Option<u64>,

    /// Verify the build tool is installed before building
    pub check_prerequisites: bool,

    /// Also create an empty `project.godot` when scaffolding
    pub create_project: bool,
}

impl Invocation {
    /// Create an invocation with default settings
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self::from_settings(working_dir, &Settings::default())
    }

    /// Create an invocation from loaded settings
    pub fn from_settings(working_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        Self {
            working_dir: working_dir.into(),
            project_name: settings.project_name.clone(),
            godot_path: settings.engine.path.clone(),
            engine_search_paths: settings.engine.search_paths.clone(),
            mode: BuildMode::parse(&settings.build.mode).unwrap_or_default(),
            desktop_targets: settings.build.desktop_targets.clone(),
            presets: ExportPresets {
                macos: settings.export.macos_preset.clone(),
                ios: settings.export.ios_preset.clone(),
                ios_simulator: settings.export.ios_simulator_preset.clone(),
            },
            simulator_rendering_method: settings.export.simulator_rendering_method.clone(),
            build_number: None,
            check_prerequisites: true,
            create_project: false,
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = Some(name.into());
        self
    }

    pub fn with_godot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.godot_path = Some(path.into());
        self
    }

    pub fn with_engine_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.engine_search_paths = paths;
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_build_number(mut self, build_number: u64) -> Self {
        self.build_number = Some(build_number);
        self
    }

    pub fn with_check_prerequisites(mut self, check: bool) -> Self {
        self.check_prerequisites = check;
        self
    }

    pub fn with_create_project(mut self, create: bool) -> Self {
        self.create_project = create;
        self
    }

    /// Layout for an existing driver package
    pub fn layout(&self) -> Result<PathLayout, PathError> {
        let name = resolve_project_name(&self.working_dir, self.project_name.as_deref())?;
        Ok(PathLayout::new(&self.working_dir, name))
    }

    /// Layout for a package that may not exist yet
    pub fn scaffold_layout(&self) -> PathLayout {
        let name = self
            .project_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(config::DEFAULT_PROJECT_NAME);
        PathLayout::new(&self.working_dir, name)
    }

    /// Engine executable
    pub fn engine(&self) -> Result<PathBuf, PathError> {
        resolve_engine(self.godot_path.as_deref(), &self.engine_search_paths)
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.build.mode = "release".to_string();
        settings.export.ios_preset = "iPhone".to_string();

        let invocation = Invocation::from_settings("/work", &settings);
        assert_eq!(invocation.mode, BuildMode::Release);
        assert_eq!(invocation.presets.for_platform(PlatformKind::MobileDevice), "iPhone");
        assert_eq!(
            invocation.presets.for_platform(PlatformKind::Desktop),
            config::DEFAULT_MACOS_PRESET
        );
        assert!(invocation.check_prerequisites);
    }

    #[test]
    fn test_overrides() {
        let invocation = Invocation::new("/work")
            .with_project_name("Space")
            .with_build_number(42)
            .with_mode(BuildMode::Release)
            .with_check_prerequisites(false);

        assert_eq!(invocation.project_name.as_deref(), Some("Space"));
        assert_eq!(invocation.build_number, Some(42));
        assert_eq!(invocation.mode, BuildMode::Release);
        assert!(!invocation.check_prerequisites);
    }

    #[test]
    fn test_layout_infers_project() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("SpaceDriver")).unwrap();

        let layout = Invocation::new(temp.path()).layout().unwrap();
        assert_eq!(layout.project_name(), "Space");
        assert_eq!(layout.driver_dir(), temp.path().join("SpaceDriver"));
    }

    #[test]
    fn test_scaffold_layout_default_name() {
        let layout = Invocation::new("/work").scaffold_layout();
        assert_eq!(layout.project_name(), config::DEFAULT_PROJECT_NAME);

        let layout = Invocation::new("/work").with_project_name("  ").scaffold_layout();
        assert_eq!(layout.project_name(), config::DEFAULT_PROJECT_NAME);

        let layout = Invocation::new("/work").with_project_name("Space").scaffold_layout();
        assert_eq!(layout.driver_name(), "SpaceDriver");
    }

    #[test]
    fn test_engine_missing() {
        let temp = TempDir::new().unwrap();
        let invocation =
            Invocation::new(temp.path()).with_engine_search_paths(vec![temp.path().to_path_buf()]);
        assert!(matches!(invocation.engine(), Err(PathError::EngineNotFound { .. })));
    }
}
