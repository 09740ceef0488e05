//! Target platforms, pipeline actions and build modes

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use sgint_core::PathLayout;

/// Runtime library every driver links against
pub const RUNTIME_LIBRARY: &str = "SwiftGodot";

/// Platform a driver is built and exported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformKind {
    /// macOS desktop
    Desktop,
    /// Physical iOS device
    MobileDevice,
    /// iOS simulator
    MobileSimulator,
}

impl PlatformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "macos",
            Self::MobileDevice => "ios",
            Self::MobileSimulator => "ios-simulator",
        }
    }

    pub fn is_mobile(&self) -> bool {
        !matches!(self, Self::Desktop)
    }

    /// Tool that compiles the driver for this platform
    pub fn build_tool(&self) -> &'static str {
        match self {
            Self::Desktop => "swift",
            Self::MobileDevice | Self::MobileSimulator => "xcodebuild",
        }
    }

    pub fn install_hint(&self) -> &'static str {
        match self {
            Self::Desktop => "Install the Xcode Command Line Tools: xcode-select --install",
            Self::MobileDevice | Self::MobileSimulator => "Install Xcode from the App Store",
        }
    }

    /// `xcodebuild -destination` value; desktop builds do not archive
    pub fn archive_destination(&self) -> Option<&'static str> {
        match self {
            Self::Desktop => None,
            Self::MobileDevice => Some("generic/platform=iOS"),
            Self::MobileSimulator => Some("generic/platform=iOS Simulator"),
        }
    }

    /// File extension of the exported package
    pub fn export_extension(&self) -> &'static str {
        match self {
            Self::Desktop => "pkg",
            Self::MobileDevice | Self::MobileSimulator => "xcodeproj",
        }
    }

    /// File name of a staged binary for library `name`
    pub fn artifact_file_name(&self, name: &str) -> String {
        match self {
            Self::Desktop => format!("lib{name}.dylib"),
            Self::MobileDevice | Self::MobileSimulator => format!("{name}.framework"),
        }
    }

    /// Binaries staged into `bin/` after a build
    pub fn artifact_names(&self, driver_name: &str) -> Vec<String> {
        [RUNTIME_LIBRARY, driver_name]
            .iter()
            .map(|name| self.artifact_file_name(name))
            .collect()
    }

    /// Whether exporting requires the compatibility renderer in `project.godot`
    pub fn patches_rendering_method(&self) -> bool {
        matches!(self, Self::MobileSimulator)
    }

    pub fn export_dir(&self, layout: &PathLayout) -> PathBuf {
        match self {
            Self::Desktop => layout.macos_export_dir(),
            Self::MobileDevice | Self::MobileSimulator => layout.ios_export_dir(),
        }
    }

    /// Exported package path, `<export dir>/<Project>.<ext>`
    pub fn export_path(&self, layout: &PathLayout) -> PathBuf {
        self.export_dir(layout).join(format!(
            "{}.{}",
            layout.project_name(),
            self.export_extension()
        ))
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a pipeline run does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Create a new driver package
    Scaffold,
    /// Build and stage the driver
    Build,
    /// Build, then launch the editor or the generated Xcode project
    Run,
    /// Build, then export a package with the engine
    Export,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scaffold => "scaffold",
            Self::Build => "build",
            Self::Run => "run",
            Self::Export => "export",
        }
    }

    /// Whether the action compiles the driver first
    pub fn builds(&self) -> bool {
        !matches!(self, Self::Scaffold)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    #[default]
    Debug,
    Release,
}

impl BuildMode {
    /// SwiftPM configuration directory name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }

    /// Xcode configuration name
    pub fn xcode_configuration(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "release" => Some(Self::Release),
            _ => None,
        }
    }
}
