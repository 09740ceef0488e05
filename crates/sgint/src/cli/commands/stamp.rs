//! Stamp command

use clap::Args;
use console::style;
use tracing::info;

use sgint_core::paths::EXPORT_PRESETS_FILE;
use sgint_core::stamp_build_number_file;

use crate::cli::{output, Cli, OutputFormat};

/// Stamp a build number into export_presets.cfg without building
#[derive(Debug, Args)]
pub struct StampCommand {
    /// Build number; defaults to --build-number
    #[arg(value_name = "BUILD_NUMBER")]
    pub number: Option<u64>,
}

impl StampCommand {
    /// Execute the stamp command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let build_number = self
            .number
            .or(cli.build_number)
            .ok_or_else(|| anyhow::anyhow!("No build number given. Pass one or use --build-number"))?;
        info!(build_number, "executing stamp command");

        let path = cli.working_dir()?.join(EXPORT_PRESETS_FILE);
        let stamped = stamp_build_number_file(&path, build_number)?;

        if cli.format == OutputFormat::Json {
            let presets: Vec<_> = stamped
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "platform": p.platform,
                        "field": if p.short { "short_version" } else { "version" },
                        "changed": p.changed,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "build_number": build_number,
                    "presets": presets,
                }))?
            );
            return Ok(());
        }
        if cli.quiet {
            return Ok(());
        }

        if stamped.is_empty() {
            output::warning("No preset declares a platform; nothing was stamped");
            return Ok(());
        }

        for preset in &stamped {
            let name = preset.name.as_deref().unwrap_or("<unnamed>");
            let field = if preset.short { "short_version" } else { "version" };
            if preset.changed {
                println!(
                    "  {} {} ({}): application/{} = {}",
                    style("•").dim(),
                    style(name).bold(),
                    preset.platform,
                    field,
                    style(build_number).green()
                );
            } else {
                output::warning(&format!("{name} has no application/{field} entry"));
            }
        }
        output::success(&format!("Stamped build number {build_number}"));

        Ok(())
    }
}
