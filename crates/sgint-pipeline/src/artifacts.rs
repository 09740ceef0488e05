//! Build artifacts and staging into the engine's `bin/` directory
//!
//! Each artifact is copied to a hidden sibling of its destination first and
//! renamed into place, so `bin/` never holds a half-copied library.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::error::{PipelineError, Result};

/// Kind of staged binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// macOS dynamic library (.dylib)
    Library,
    /// iOS framework bundle (.framework)
    Framework,
}

impl ArtifactKind {
    fn for_path(path: &Path) -> Self {
        if path.is_dir() {
            Self::Framework
        } else {
            Self::Library
        }
    }
}

/// A binary copied into `bin/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedArtifact {
    /// Where the build tool left it
    pub source: PathBuf,

    /// Where the engine loads it from
    pub destination: PathBuf,

    pub kind: ArtifactKind,
}

impl StagedArtifact {
    pub fn filename(&self) -> Option<&str> {
        self.destination.file_name().and_then(|n| n.to_str())
    }
}

/// Hidden sibling used while copying into `destination`
pub fn staging_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{name}.staging"))
}

/// Copy `source` into `dest_dir`, replacing any previous copy
#[instrument(skip_all, fields(source = %source.display()))]
pub fn stage_artifact(source: &Path, dest_dir: &Path) -> Result<StagedArtifact> {
    if !source.exists() {
        return Err(PipelineError::ArtifactMissing {
            path: source.to_path_buf(),
        });
    }

    let file_name = source.file_name().ok_or_else(|| PipelineError::ArtifactMissing {
        path: source.to_path_buf(),
    })?;
    let destination = dest_dir.join(file_name);
    let staging = staging_path(&destination);

    fs::create_dir_all(dest_dir).map_err(|e| PipelineError::io(dest_dir, e))?;
    remove_path(&staging)?;

    if let Err(e) = copy_recursive(source, &staging) {
        let _ = remove_path(&staging);
        return Err(e);
    }

    remove_path(&destination)?;
    fs::rename(&staging, &destination).map_err(|e| PipelineError::io(&destination, e))?;

    debug!(destination = %destination.display(), "staged artifact");
    Ok(StagedArtifact {
        source: source.to_path_buf(),
        kind: ArtifactKind::for_path(&destination),
        destination,
    })
}

/// Remove a file, directory or symlink if it exists
pub fn remove_path(path: &Path) -> Result<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(PipelineError::io(path, e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| PipelineError::io(path, e))
}

fn copy_recursive(source: &Path, dest: &Path) -> Result<()> {
    if !source.is_dir() {
        fs::copy(source, dest).map_err(|e| PipelineError::io(source, e))?;
        return Ok(());
    }

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            PipelineError::io(path, e.into())
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| PipelineError::ArtifactMissing {
                path: entry.path().to_path_buf(),
            })?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| PipelineError::io(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| PipelineError::io(entry.path(), e))?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    let points_to = fs::read_link(link).map_err(|e| PipelineError::io(link, e))?;
    std::os::unix::fs::symlink(points_to, target).map_err(|e| PipelineError::io(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> Result<()> {
    fs::copy(link, target)
        .map(|_| ())
        .map_err(|e| PipelineError::io(link, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn residue(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".staging"))
            .collect()
    }

    #[test]
    fn test_stage_file_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("libSpaceDriver.dylib");
        let bin = temp.path().join("bin");
        fs::write(&source, "new").unwrap();
        fs::create_dir(&bin).unwrap();
        fs::write(bin.join("libSpaceDriver.dylib"), "old").unwrap();

        let staged = stage_artifact(&source, &bin).unwrap();

        assert_eq!(staged.kind, ArtifactKind::Library);
        assert_eq!(staged.filename(), Some("libSpaceDriver.dylib"));
        assert_eq!(fs::read_to_string(&staged.destination).unwrap(), "new");
        assert!(residue(&bin).is_empty());
    }

    #[test]
    fn test_stage_bundle() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("SpaceDriver.framework");
        fs::create_dir_all(source.join("Headers")).unwrap();
        fs::write(source.join("SpaceDriver"), "binary").unwrap();
        fs::write(source.join("Headers/SpaceDriver.h"), "header").unwrap();

        let bin = temp.path().join("bin");
        fs::create_dir_all(bin.join("SpaceDriver.framework")).unwrap();
        fs::write(bin.join("SpaceDriver.framework/stale"), "").unwrap();

        let staged = stage_artifact(&source, &bin).unwrap();

        assert_eq!(staged.kind, ArtifactKind::Framework);
        assert_eq!(
            fs::read_to_string(staged.destination.join("Headers/SpaceDriver.h")).unwrap(),
            "header"
        );
        assert!(!staged.destination.join("stale").exists());
        assert!(residue(&bin).is_empty());
    }

    #[test]
    fn test_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = stage_artifact(&temp.path().join("missing.dylib"), temp.path()).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactMissing { .. }));
    }

    #[test]
    fn test_leftover_staging_is_replaced() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("libSwiftGodot.dylib");
        let bin = temp.path().join("bin");
        fs::write(&source, "lib").unwrap();
        fs::create_dir(&bin).unwrap();
        fs::write(bin.join(".libSwiftGodot.dylib.staging"), "partial").unwrap();

        stage_artifact(&source, &bin).unwrap();

        assert!(residue(&bin).is_empty());
        assert_eq!(fs::read_to_string(bin.join("libSwiftGodot.dylib")).unwrap(), "lib");
    }

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("/p/bin/libA.dylib")),
            PathBuf::from("/p/bin/.libA.dylib.staging")
        );
    }
}
