//! Build command

use clap::Args;

use sgint_pipeline::ActionKind;

use super::TargetArgs;
use crate::cli::Cli;

/// Build the driver and stage it into bin/
#[derive(Debug, Args)]
pub struct BuildCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl BuildCommand {
    /// Execute the build command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        self.target.execute(cli, ActionKind::Build)
    }
}
