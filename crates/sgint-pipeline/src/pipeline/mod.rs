//! Platform build pipeline
//!
//! One fixed sequence per run: resolve the project, build the driver, stage
//! its binaries into `bin/`, write the extension descriptor, then export or
//! launch. Every external command goes through a [`ProcessRunner`].

mod report;

pub use report::{PipelineReport, PipelineStage};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};

use sgint_core::process::quote;
use sgint_core::templates::{with_driver_name, EXTENSION_TEMPLATE};
use sgint_core::{
    stamp_build_number_file, PathLayout, ProcessRunner, ShellCommand, StampedPreset,
};

use crate::artifacts::{remove_path, stage_artifact, StagedArtifact};
use crate::context::Invocation;
use crate::error::{PipelineError, Result};
use crate::platform::{ActionKind, BuildMode, PlatformKind};
use crate::prerequisites::check_prerequisites;
use crate::render_patch::RenderingMethodPatch;
use crate::scaffold::scaffold;

/// Runs build, export and launch actions for one invocation
pub struct PlatformBuildPipeline {
    runner: Arc<dyn ProcessRunner>,
    invocation: Invocation,
}

impl PlatformBuildPipeline {
    pub fn new(runner: Arc<dyn ProcessRunner>, invocation: Invocation) -> Self {
        Self { runner, invocation }
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// Query the engine version; `None` if the engine does not answer
    pub async fn engine_version(&self, engine: &Path) -> Option<String> {
        let command = ShellCommand::new(format!("{} --version", quote(&engine.to_string_lossy())));
        let result = self.runner.run_captured(&command).await;
        if !result.success() {
            warn!(exit_code = result.exit_code, "engine did not report a version");
            return None;
        }

        let version = result.output.trim().to_string();
        info!(version = %version, engine = %engine.display(), "engine version");
        Some(version)
    }

    /// Stamp the invocation's build number into `export_presets.cfg`
    pub fn stamp_build_number(&self) -> Result<Vec<StampedPreset>> {
        let Some(build_number) = self.invocation.build_number else {
            return Ok(Vec::new());
        };
        let path = self
            .invocation
            .working_dir
            .join(sgint_core::paths::EXPORT_PRESETS_FILE);
        Ok(stamp_build_number_file(&path, build_number)?)
    }

    /// Create a new driver package
    #[instrument(skip_all, fields(path = %self.invocation.working_dir.display()))]
    pub fn scaffold(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        let mut report = PipelineReport::new(None, ActionKind::Scaffold);
        let layout = self.invocation.scaffold_layout();
        report.project_name = Some(layout.project_name().to_string());

        enter(&mut report, PipelineStage::Scaffolding);
        match scaffold(&layout, self.invocation.create_project) {
            Ok(created) => report.created = created,
            Err(e) => {
                enter(&mut report, PipelineStage::Failed);
                return Err(e);
            }
        }

        enter(&mut report, PipelineStage::Done);
        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    /// Build for `platform`, then carry out `action`
    #[instrument(skip_all, fields(path = %self.invocation.working_dir.display(), platform = %platform, action = %action))]
    pub async fn run(&self, platform: PlatformKind, action: ActionKind) -> Result<PipelineReport> {
        if !action.builds() {
            return self.scaffold();
        }

        let start = Instant::now();
        let mut report = PipelineReport::new(Some(platform), action);

        match self.run_stages(platform, action, &mut report).await {
            Ok(()) => {
                enter(&mut report, PipelineStage::Done);
                report.duration_ms = start.elapsed().as_millis() as u64;
                info!(
                    artifact_count = report.artifacts.len(),
                    duration_ms = report.duration_ms,
                    "pipeline completed"
                );
                Ok(report)
            }
            Err(e) => {
                let failed_in = report.stage();
                enter(&mut report, PipelineStage::Failed);
                error!(stage = %failed_in, error = %e, "pipeline failed");
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        platform: PlatformKind,
        action: ActionKind,
        report: &mut PipelineReport,
    ) -> Result<()> {
        enter(report, PipelineStage::Resolving);
        let layout = self.invocation.layout()?;
        report.project_name = Some(layout.project_name().to_string());

        if self.invocation.check_prerequisites {
            check_prerequisites(platform).into_result()?;
        }

        let needs_engine = action == ActionKind::Export
            || (action == ActionKind::Run && platform == PlatformKind::Desktop);
        let engine = if needs_engine {
            Some(self.invocation.engine()?)
        } else {
            None
        };

        enter(report, PipelineStage::Building);
        match platform {
            PlatformKind::Desktop => self.build_desktop(&layout).await?,
            PlatformKind::MobileDevice | PlatformKind::MobileSimulator => {
                self.build_mobile(platform, &layout).await?
            }
        }

        enter(report, PipelineStage::ArtifactStaging);
        report.artifacts = self.stage_artifacts(platform, &layout)?;

        report.descriptor = Some(write_descriptor(&layout)?);
        enter(report, PipelineStage::DescriptorWritten);

        match (action, engine) {
            (ActionKind::Export, Some(engine)) => {
                let export_path = self.export(platform, &layout, &engine, report).await?;
                report.export_path = Some(export_path);
            }
            (ActionKind::Run, engine) => {
                enter(report, PipelineStage::Launching);
                self.launch(platform, &layout, engine.as_deref()).await?;
            }
            _ => {}
        }

        Ok(())
    }

    async fn build_desktop(&self, layout: &PathLayout) -> Result<()> {
        let mut script = String::from("swift build");
        if self.invocation.mode == BuildMode::Release {
            script.push_str(" -c release");
        }
        self.stream(ShellCommand::new(script).in_dir(layout.driver_dir()))
            .await
    }

    async fn build_mobile(&self, platform: PlatformKind, layout: &PathLayout) -> Result<()> {
        let archive = layout.archive_path();
        if archive.exists() {
            debug!(path = %archive.display(), "removing stale archive");
            remove_path(&archive)?;
        }

        let destination = platform.archive_destination().unwrap_or_default();
        let script = format!(
            "xcodebuild archive -scheme {} -configuration {} -archivePath ./xcodebuild -destination {}",
            quote(&layout.driver_name()),
            self.invocation.mode.xcode_configuration(),
            quote(destination),
        );
        self.stream(ShellCommand::new(script).in_dir(layout.driver_dir()))
            .await
    }

    fn stage_artifacts(
        &self,
        platform: PlatformKind,
        layout: &PathLayout,
    ) -> Result<Vec<StagedArtifact>> {
        let bin = layout.bin_dir();
        let names = platform.artifact_names(&layout.driver_name());

        if platform.is_mobile() {
            let products = layout.archive_products_dir();
            let staged = names
                .iter()
                .map(|name| stage_artifact(&products.join(name), &bin))
                .collect::<Result<Vec<_>>>()?;
            remove_path(&layout.archive_path())?;
            return Ok(staged);
        }

        let mode = self.invocation.mode.as_str();
        let product_dirs: Vec<PathBuf> = self
            .invocation
            .desktop_targets
            .iter()
            .map(|target| layout.desktop_products_dir(target, mode))
            .collect();

        names
            .iter()
            .map(|name| {
                // Target triples are searched in order; the first one that
                // produced the library wins.
                let source = product_dirs
                    .iter()
                    .map(|dir| dir.join(name))
                    .find(|path| path.exists())
                    .or_else(|| product_dirs.first().map(|dir| dir.join(name)))
                    .unwrap_or_else(|| PathBuf::from(name));
                stage_artifact(&source, &bin)
            })
            .collect()
    }

    async fn export(
        &self,
        platform: PlatformKind,
        layout: &PathLayout,
        engine: &Path,
        report: &mut PipelineReport,
    ) -> Result<PathBuf> {
        let patch = if platform.patches_rendering_method() {
            let patch = RenderingMethodPatch::apply(
                &layout.project_file(),
                &self.invocation.simulator_rendering_method,
            )?;
            if patch.is_some() {
                enter(report, PipelineStage::ConfigPatched);
            }
            patch
        } else {
            None
        };

        enter(report, PipelineStage::Exporting);
        let result = self.export_package(platform, layout, engine).await;

        if let Some(patch) = patch {
            enter(report, PipelineStage::ConfigRestored);
            if let Err(restore_err) = patch.restore() {
                if result.is_ok() {
                    return Err(restore_err);
                }
                error!(error = %restore_err, "failed to restore rendering method");
            }
        }

        result
    }

    async fn export_package(
        &self,
        platform: PlatformKind,
        layout: &PathLayout,
        engine: &Path,
    ) -> Result<PathBuf> {
        let export_dir = platform.export_dir(layout);
        fs::create_dir_all(&export_dir).map_err(|e| PipelineError::io(&export_dir, e))?;

        let export_path = platform.export_path(layout);
        let script = format!(
            "{} --headless --export-release {} {}",
            quote(&engine.to_string_lossy()),
            quote(self.invocation.presets.for_platform(platform)),
            quote(&export_path.to_string_lossy()),
        );
        self.stream(ShellCommand::new(script).in_dir(layout.root()))
            .await?;

        if !export_path.exists() {
            return Err(PipelineError::ArtifactMissing { path: export_path });
        }

        info!(path = %export_path.display(), "exported");
        Ok(export_path)
    }

    async fn launch(
        &self,
        platform: PlatformKind,
        layout: &PathLayout,
        engine: Option<&Path>,
    ) -> Result<()> {
        let script = match (platform, engine) {
            (PlatformKind::Desktop, Some(engine)) => format!(
                "{} --editor --path {}",
                quote(&engine.to_string_lossy()),
                quote(&layout.root().to_string_lossy()),
            ),
            _ => {
                let project = platform.export_path(layout);
                if !project.exists() {
                    return Err(PipelineError::ArtifactMissing { path: project });
                }
                format!("open {}", quote(&project.to_string_lossy()))
            }
        };

        self.stream(ShellCommand::new(script).in_dir(layout.root()))
            .await
    }

    async fn stream(&self, command: ShellCommand) -> Result<()> {
        info!(command = %command, "running");
        let exit_code = self.runner.run_streaming(&command).await;
        if exit_code != 0 {
            return Err(PipelineError::subprocess(command.script(), exit_code));
        }
        Ok(())
    }
}

/// Write `bin/<Driver>.gdextension`, replacing any existing descriptor
fn write_descriptor(layout: &PathLayout) -> Result<PathBuf> {
    let bin = layout.bin_dir();
    fs::create_dir_all(&bin).map_err(|e| PipelineError::io(&bin, e))?;

    let path = layout.extension_descriptor();
    let contents = with_driver_name(EXTENSION_TEMPLATE, &layout.driver_name());
    fs::write(&path, contents).map_err(|e| PipelineError::io(&path, e))?;

    debug!(path = %path.display(), "wrote extension descriptor");
    Ok(path)
}

fn enter(report: &mut PipelineReport, stage: PipelineStage) {
    debug!(from = %report.stage(), to = %stage, "pipeline stage");
    report.stages.push(stage);
}
