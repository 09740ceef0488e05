//! New driver package scaffolding

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use sgint_core::templates::{
    with_driver_name, DRIVER_TEMPLATE, PACKAGE_TEMPLATE, TESTS_TEMPLATE,
};
use sgint_core::PathLayout;

use crate::error::{PipelineError, Result};

/// Create `bin/` and the driver package for `layout`.
///
/// Existing files are left untouched. Returns the files that were written.
#[instrument(skip_all, fields(driver = %layout.driver_name(), create_project = create_project))]
pub fn scaffold(layout: &PathLayout, create_project: bool) -> Result<Vec<PathBuf>> {
    let driver = layout.driver_name();
    let mut created = Vec::new();

    for dir in [
        layout.bin_dir(),
        layout.driver_sources_dir(),
        layout.driver_tests_dir(),
    ] {
        fs::create_dir_all(&dir).map_err(|e| PipelineError::io(&dir, e))?;
    }

    let files = [
        (layout.driver_dir().join("Package.swift"), PACKAGE_TEMPLATE),
        (
            layout.driver_sources_dir().join(format!("{driver}.swift")),
            DRIVER_TEMPLATE,
        ),
        (
            layout.driver_tests_dir().join(format!("{driver}Tests.swift")),
            TESTS_TEMPLATE,
        ),
    ];

    for (path, template) in files {
        if write_new(&path, &with_driver_name(template, &driver))? {
            created.push(path);
        }
    }

    if create_project {
        let project = layout.project_file();
        if write_new(&project, "")? {
            created.push(project);
        }
    }

    info!(files = created.len(), "scaffolded driver package");
    Ok(created)
}

fn write_new(path: &Path, contents: &str) -> Result<bool> {
    if path.exists() {
        debug!(path = %path.display(), "already exists, skipping");
        return Ok(false);
    }
    fs::write(path, contents).map_err(|e| PipelineError::io(path, e))?;
    Ok(true)
}
