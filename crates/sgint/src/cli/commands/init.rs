//! Init command

use std::sync::Arc;

use clap::Args;
use tracing::info;

use sgint_core::config::{DEFAULT_SETTINGS_TEMPLATE, DEFAULT_SETTINGS_TOML};
use sgint_core::{ProcessRunner, SystemRunner};
use sgint_pipeline::PlatformBuildPipeline;

use super::target::print_report;
use crate::cli::{output, Cli};

/// Create a new driver package
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Also create an empty project.godot
    #[arg(long)]
    pub create_project: bool,

    /// Also write a default sgint.toml
    #[arg(long)]
    pub write_settings: bool,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(create_project = self.create_project, write_settings = self.write_settings, "executing init command");

        let invocation = cli.invocation()?.with_create_project(self.create_project);
        let settings_path = invocation.working_dir.join(DEFAULT_SETTINGS_TOML);

        let runner: Arc<dyn ProcessRunner> = Arc::new(SystemRunner::new());
        let pipeline = PlatformBuildPipeline::new(runner, invocation);
        let mut report = pipeline.scaffold()?;

        if self.write_settings {
            if settings_path.exists() {
                if cli.prints_text() {
                    output::warning(&format!(
                        "{} already exists, leaving it alone",
                        settings_path.display()
                    ));
                }
            } else {
                std::fs::write(&settings_path, DEFAULT_SETTINGS_TEMPLATE)?;
                report.created.push(settings_path);
            }
        }

        print_report(cli, &report)
    }
}
