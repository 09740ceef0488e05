//! Platform selection shared by build, run and export

use std::sync::Arc;

use clap::{Args, ValueEnum};
use console::style;
use tracing::{debug, info};

use sgint_core::{ProcessRunner, SystemRunner};
use sgint_pipeline::{ActionKind, BuildMode, PipelineReport, PlatformBuildPipeline, PlatformKind};

use crate::cli::{output, Cli, OutputFormat};

/// Target platform and build options
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Target platform
    #[arg(short, long, value_enum, default_value = "macos")]
    pub platform: PlatformArg,

    /// Build in release mode
    #[arg(long)]
    pub release: bool,

    /// Skip prerequisite checks
    #[arg(long)]
    pub skip_checks: bool,
}

/// Target platform argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    /// macOS desktop
    #[value(name = "macos")]
    MacOs,
    /// iOS device
    Ios,
    /// iOS simulator
    #[value(name = "ios-simulator")]
    IosSimulator,
}

impl From<PlatformArg> for PlatformKind {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::MacOs => PlatformKind::Desktop,
            PlatformArg::Ios => PlatformKind::MobileDevice,
            PlatformArg::IosSimulator => PlatformKind::MobileSimulator,
        }
    }
}

impl TargetArgs {
    /// Run the pipeline for `action` on the selected platform
    pub fn execute(&self, cli: &Cli, action: ActionKind) -> anyhow::Result<()> {
        let platform: PlatformKind = self.platform.into();
        info!(platform = %platform, action = %action, release = self.release, "executing pipeline command");

        let mut invocation = cli
            .invocation()?
            .with_check_prerequisites(!self.skip_checks);
        if self.release {
            invocation = invocation.with_mode(BuildMode::Release);
        }

        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner::new());
        let pipeline = PlatformBuildPipeline::new(runner, invocation);

        // Run async operation in tokio runtime
        let runtime = tokio::runtime::Runtime::new()?;
        let report = runtime.block_on(async {
            match pipeline.invocation().engine() {
                Ok(engine) => {
                    if let Some(version) = pipeline.engine_version(&engine).await {
                        if cli.prints_text() {
                            output::info(&format!("Godot {}", style(version).bold()));
                        }
                    }
                }
                // Only export and desktop run need the engine; the pipeline reports it there
                Err(e) => debug!(error = %e, "engine not resolved"),
            }

            let stamped = pipeline.stamp_build_number()?;
            if cli.prints_text() {
                for preset in &stamped {
                    let name = preset.name.as_deref().unwrap_or(&preset.platform);
                    output::info(&format!("Stamped build number into preset {name}"));
                }
            }

            if cli.prints_text() {
                println!();
                println!(
                    "{} {} for {}...",
                    style(action_verb(action)).bold(),
                    style(pipeline.invocation().mode.as_str()).cyan(),
                    style(platform).cyan()
                );
                println!();
            }

            pipeline.run(platform, action).await
        })?;

        print_report(cli, &report)
    }
}

fn action_verb(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Scaffold => "Scaffolding",
        ActionKind::Build => "Building",
        ActionKind::Run => "Building and launching",
        ActionKind::Export => "Building and exporting",
    }
}

/// Print a pipeline report in the selected output format
pub fn print_report(cli: &Cli, report: &PipelineReport) -> anyhow::Result<()> {
    if cli.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if cli.quiet {
        return Ok(());
    }

    println!();
    output::success(&format!(
        "{} completed in {:.1}s",
        report.action,
        report.duration_ms as f64 / 1000.0
    ));

    if !report.artifacts.is_empty() {
        println!();
        println!("{}:", style("Staged").bold());
        for artifact in &report.artifacts {
            println!(
                "  • {}",
                output::path_style().apply_to(artifact.destination.display())
            );
        }
    }
    if let Some(descriptor) = &report.descriptor {
        println!(
            "{}",
            output::key_value("Descriptor", &descriptor.display().to_string())
        );
    }
    if let Some(export_path) = &report.export_path {
        println!(
            "{}",
            output::key_value("Exported", &export_path.display().to_string())
        );
    }
    if !report.created.is_empty() {
        println!();
        println!("{}:", style("Created").bold());
        for path in &report.created {
            println!("  • {}", output::path_style().apply_to(path.display()));
        }
    }

    Ok(())
}
