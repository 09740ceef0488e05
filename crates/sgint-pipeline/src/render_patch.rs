//! Temporary rendering method override in `project.godot`
//!
//! The simulator only supports the compatibility renderer, so the mobile
//! rendering method is swapped for the duration of a simulator export and the
//! original line is written back afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::{PipelineError, Result};

/// Project setting that selects the mobile renderer
pub const RENDERING_METHOD_KEY: &str = "renderer/rendering_method.mobile";

/// A rewritten `project.godot` line and what it said before
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderingMethodPatch {
    pub path: PathBuf,
    pub line_index: usize,
    pub original_line: String,
}

impl RenderingMethodPatch {
    /// Rewrite the first rendering method line to `method` and persist it.
    ///
    /// Returns `None` when the project does not set a mobile rendering method.
    #[instrument(skip_all, fields(path = %path.display(), method = method))]
    pub fn apply(path: &Path, method: &str) -> Result<Option<Self>> {
        let mut lines = read_lines(path)?;

        let Some(line_index) = lines.iter().position(|l| l.contains(RENDERING_METHOD_KEY)) else {
            warn!("no {RENDERING_METHOD_KEY} line; exporting without a renderer override");
            return Ok(None);
        };

        let original_line = lines[line_index].clone();
        let line_end = if original_line.ends_with('\r') { "\r" } else { "" };
        lines[line_index] = format!("{RENDERING_METHOD_KEY}=\"{method}\"{line_end}");
        write_lines(path, &lines)?;

        info!(line = line_index + 1, "rendering method overridden");
        Ok(Some(Self {
            path: path.to_path_buf(),
            line_index,
            original_line,
        }))
    }

    /// Write the recorded line back.
    ///
    /// The engine may re-save the project during export, so the line is
    /// looked up again if it is no longer at the recorded index.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn restore(self) -> Result<()> {
        let mut lines = read_lines(&self.path)?;

        let at_recorded = lines
            .get(self.line_index)
            .is_some_and(|l| l.contains(RENDERING_METHOD_KEY));
        let index = if at_recorded {
            Some(self.line_index)
        } else {
            lines.iter().position(|l| l.contains(RENDERING_METHOD_KEY))
        };

        let Some(index) = index else {
            warn!("no {RENDERING_METHOD_KEY} line left; rendering method not restored");
            return Ok(());
        };
        if index != self.line_index {
            debug!(from = self.line_index + 1, to = index + 1, "rendering method line moved");
        }

        lines[index] = self.original_line;
        write_lines(&self.path, &lines)?;
        debug!("rendering method restored");
        Ok(())
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
    Ok(text.split('\n').map(String::from).collect())
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    fs::write(path, lines.join("\n")).map_err(|e| PipelineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT: &str = "config_version=5\n\n[rendering]\n\nrenderer/rendering_method=\"mobile\"\nrenderer/rendering_method.mobile=\"forward_plus\"\n";

    #[test]
    fn test_apply_and_restore() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.godot");
        fs::write(&path, PROJECT).unwrap();

        let patch = RenderingMethodPatch::apply(&path, "gl_compatibility")
            .unwrap()
            .unwrap();
        assert_eq!(patch.line_index, 5);
        assert_eq!(patch.original_line, "renderer/rendering_method.mobile=\"forward_plus\"");

        let patched = fs::read_to_string(&path).unwrap();
        assert!(patched.contains("renderer/rendering_method.mobile=\"gl_compatibility\"\n"));
        assert!(patched.contains("renderer/rendering_method=\"mobile\"\n"));

        patch.restore().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), PROJECT);
    }

    #[test]
    fn test_absent_line_is_not_patched() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.godot");
        fs::write(&path, "config_version=5\n").unwrap();

        assert!(RenderingMethodPatch::apply(&path, "gl_compatibility")
            .unwrap()
            .is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "config_version=5\n");
    }

    #[test]
    fn test_crlf_preserved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.godot");
        let text = "a=1\r\nrenderer/rendering_method.mobile=\"mobile\"\r\nb=2\r\n";
        fs::write(&path, text).unwrap();

        let patch = RenderingMethodPatch::apply(&path, "gl_compatibility")
            .unwrap()
            .unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("renderer/rendering_method.mobile=\"gl_compatibility\"\r\n"));

        patch.restore().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), text);
    }

    #[test]
    fn test_restore_follows_moved_line() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.godot");
        fs::write(&path, PROJECT).unwrap();

        let patch = RenderingMethodPatch::apply(&path, "gl_compatibility")
            .unwrap()
            .unwrap();

        // Engine re-saved the project with an extra setting above the patch
        let resaved = fs::read_to_string(&path)
            .unwrap()
            .replace("[rendering]\n", "[rendering]\n\ntextures/vram_compression=true\n");
        fs::write(&path, resaved).unwrap();

        patch.restore().unwrap();

        let restored = fs::read_to_string(&path).unwrap();
        assert!(restored.contains("renderer/rendering_method.mobile=\"forward_plus\"\n"));
        assert!(restored.contains("renderer/rendering_method=\"mobile\"\n"));
        assert!(restored.contains("textures/vram_compression=true\n"));
        assert!(!restored.contains("gl_compatibility"));
    }

    #[test]
    fn test_restore_without_line_leaves_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("project.godot");
        fs::write(&path, PROJECT).unwrap();

        let patch = RenderingMethodPatch::apply(&path, "gl_compatibility")
            .unwrap()
            .unwrap();
        fs::write(&path, "config_version=5\na=1\nb=2\nc=3\nd=4\ne=5\n").unwrap();

        patch.restore().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "config_version=5\na=1\nb=2\nc=3\nd=4\ne=5\n"
        );
    }

    #[test]
    fn test_missing_project_file() {
        let temp = TempDir::new().unwrap();
        let err = RenderingMethodPatch::apply(&temp.path().join("project.godot"), "x").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
