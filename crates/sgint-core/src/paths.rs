//! Path resolution for a Godot project with a Swift driver package
//!
//! Everything here is derived from the working directory and the project name.
//! The only I/O is existence checks and listing the working directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::error::PathError;

/// Suffix that marks the driver package directory
pub const DRIVER_SUFFIX: &str = "Driver";

/// Application bundle name of the engine
pub const GODOT_BUNDLE: &str = "Godot.app";

/// Executable location inside the application bundle
pub const GODOT_EXECUTABLE_SUBPATH: &str = "Contents/MacOS/Godot";

/// Engine project file
pub const PROJECT_FILE: &str = "project.godot";

/// Engine export presets file
pub const EXPORT_PRESETS_FILE: &str = "export_presets.cfg";

/// Read-only view of every path a pipeline run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    root: PathBuf,
    project_name: String,
}

impl PathLayout {
    /// Create a layout for `project_name` rooted at `root`
    pub fn new(root: impl Into<PathBuf>, project_name: impl AsRef<str>) -> Self {
        Self {
            root: root.into(),
            project_name: project_name.as_ref().trim().to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Display name of the driver, e.g. `SpaceDriver`
    pub fn driver_name(&self) -> String {
        format!("{}{}", self.project_name, DRIVER_SUFFIX)
    }

    /// Swift package of the driver
    pub fn driver_dir(&self) -> PathBuf {
        self.root.join(self.driver_name())
    }

    pub fn driver_sources_dir(&self) -> PathBuf {
        self.driver_dir().join("Sources").join(self.driver_name())
    }

    pub fn driver_tests_dir(&self) -> PathBuf {
        self.driver_dir()
            .join("Tests")
            .join(format!("{}Tests", self.driver_name()))
    }

    /// Shared output directory the engine loads binaries from
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Archive produced by `xcodebuild archive -archivePath ./xcodebuild`
    pub fn archive_path(&self) -> PathBuf {
        self.driver_dir().join("xcodebuild.xcarchive")
    }

    /// Framework bundles inside the archive
    pub fn archive_products_dir(&self) -> PathBuf {
        self.archive_path()
            .join("Products")
            .join("usr")
            .join("local")
            .join("lib")
    }

    /// SwiftPM products for one target triple and build mode
    pub fn desktop_products_dir(&self, target: &str, mode: &str) -> PathBuf {
        self.driver_dir().join(".build").join(target).join(mode)
    }

    pub fn ios_export_dir(&self) -> PathBuf {
        self.root.join("exports").join("ios")
    }

    pub fn macos_export_dir(&self) -> PathBuf {
        self.root.join("exports").join("macos")
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join(PROJECT_FILE)
    }

    pub fn export_presets_file(&self) -> PathBuf {
        self.root.join(EXPORT_PRESETS_FILE)
    }

    /// Extension descriptor the engine reads to locate the driver
    pub fn extension_descriptor(&self) -> PathBuf {
        self.bin_dir().join(format!("{}.gdextension", self.driver_name()))
    }
}

/// Resolve the project name from an override or the driver package on disk.
///
/// Without an override, exactly one directory in `root` must contain
/// [`DRIVER_SUFFIX`] in its name.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn resolve_project_name(root: &Path, explicit: Option<&str>) -> Result<String, PathError> {
    if let Some(name) = explicit {
        let name = name.trim().to_string();
        debug!(name = %name, "using explicit project name");
        return Ok(name);
    }

    let mut candidates: Vec<String> = std::fs::read_dir(root)?
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(String::from))
        .filter(|name| name.contains(DRIVER_SUFFIX))
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(PathError::DriverNotFound(root.to_path_buf())),
        1 => {
            let driver = &candidates[0];
            let name = driver
                .strip_suffix(DRIVER_SUFFIX)
                .map(String::from)
                .unwrap_or_else(|| driver.replace(DRIVER_SUFFIX, ""));
            info!(driver = %driver, project = %name, "inferred project from driver package");
            Ok(name)
        }
        _ => Err(PathError::DriverAmbiguous { candidates }),
    }
}

/// Engine executable inside an application bundle
pub fn engine_executable(bundle: &Path) -> PathBuf {
    bundle.join(GODOT_EXECUTABLE_SUBPATH)
}

/// Resolve the engine executable.
///
/// An explicit bundle path must contain the executable. Otherwise each search
/// directory is checked in order for `Godot.app`.
#[instrument(skip_all)]
pub fn resolve_engine(explicit: Option<&Path>, search_paths: &[PathBuf]) -> Result<PathBuf, PathError> {
    if let Some(bundle) = explicit {
        let executable = engine_executable(bundle);
        if executable.is_file() {
            debug!(path = %executable.display(), "using explicit engine path");
            return Ok(executable);
        }
        return Err(PathError::PathNotFound(bundle.to_path_buf()));
    }

    for dir in search_paths {
        let executable = engine_executable(&dir.join(GODOT_BUNDLE));
        if executable.is_file() {
            info!(path = %executable.display(), "found engine");
            return Ok(executable);
        }
    }

    Err(PathError::EngineNotFound {
        searched: search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_engine(dir: &Path) -> PathBuf {
        let executable = engine_executable(&dir.join(GODOT_BUNDLE));
        std::fs::create_dir_all(executable.parent().unwrap()).unwrap();
        std::fs::write(&executable, "").unwrap();
        executable
    }

    #[test]
    fn test_layout_paths() {
        let layout = PathLayout::new("/work", " Space ");

        assert_eq!(layout.project_name(), "Space");
        assert_eq!(layout.driver_name(), "SpaceDriver");
        assert_eq!(layout.driver_dir(), PathBuf::from("/work/SpaceDriver"));
        assert_eq!(
            layout.driver_sources_dir(),
            PathBuf::from("/work/SpaceDriver/Sources/SpaceDriver")
        );
        assert_eq!(
            layout.driver_tests_dir(),
            PathBuf::from("/work/SpaceDriver/Tests/SpaceDriverTests")
        );
        assert_eq!(layout.bin_dir(), PathBuf::from("/work/bin"));
        assert_eq!(
            layout.archive_products_dir(),
            PathBuf::from("/work/SpaceDriver/xcodebuild.xcarchive/Products/usr/local/lib")
        );
        assert_eq!(
            layout.desktop_products_dir("arm64-apple-macosx", "debug"),
            PathBuf::from("/work/SpaceDriver/.build/arm64-apple-macosx/debug")
        );
        assert_eq!(layout.ios_export_dir(), PathBuf::from("/work/exports/ios"));
        assert_eq!(layout.macos_export_dir(), PathBuf::from("/work/exports/macos"));
        assert_eq!(
            layout.extension_descriptor(),
            PathBuf::from("/work/bin/SpaceDriver.gdextension")
        );
    }

    #[test]
    fn test_resolve_project_name_override() {
        let temp = TempDir::new().unwrap();
        let name = resolve_project_name(temp.path(), Some("  Rocket\n")).unwrap();
        assert_eq!(name, "Rocket");
    }

    #[test]
    fn test_resolve_project_name_from_driver_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("RocketDriver")).unwrap();
        std::fs::create_dir(temp.path().join("bin")).unwrap();

        assert_eq!(resolve_project_name(temp.path(), None).unwrap(), "Rocket");
    }

    #[test]
    fn test_resolve_project_name_not_found() {
        let temp = TempDir::new().unwrap();
        let err = resolve_project_name(temp.path(), None).unwrap_err();
        assert!(matches!(err, PathError::DriverNotFound(_)));
    }

    #[test]
    fn test_resolve_project_name_ambiguous() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("ADriver")).unwrap();
        std::fs::create_dir(temp.path().join("BDriver")).unwrap();

        match resolve_project_name(temp.path(), None).unwrap_err() {
            PathError::DriverAmbiguous { candidates } => {
                assert_eq!(candidates, vec!["ADriver".to_string(), "BDriver".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_engine_explicit() {
        let temp = TempDir::new().unwrap();
        let executable = fake_engine(temp.path());
        let bundle = temp.path().join(GODOT_BUNDLE);

        assert_eq!(resolve_engine(Some(&bundle), &[]).unwrap(), executable);
    }

    #[test]
    fn test_resolve_engine_explicit_invalid() {
        let temp = TempDir::new().unwrap();
        // A valid engine in the search path does not rescue a bad explicit path
        fake_engine(temp.path());
        let bogus = temp.path().join("Nope.app");

        let err = resolve_engine(Some(&bogus), &[temp.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, PathError::PathNotFound(_)));
    }

    #[test]
    fn test_resolve_engine_search_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = fake_engine(first.path());
        fake_engine(second.path());

        let search = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(resolve_engine(None, &search).unwrap(), expected);
    }

    #[test]
    fn test_resolve_engine_not_found() {
        let temp = TempDir::new().unwrap();
        let err = resolve_engine(None, &[temp.path().to_path_buf()]).unwrap_err();
        assert!(matches!(err, PathError::EngineNotFound { .. }));
    }
}
