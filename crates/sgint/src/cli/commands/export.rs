//! Export command

use clap::Args;

use sgint_pipeline::ActionKind;

use super::TargetArgs;
use crate::cli::Cli;

/// Build, then export a package with Godot
#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl ExportCommand {
    /// Execute the export command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        self.target.execute(cli, ActionKind::Export)
    }
}
