//! Run command

use clap::Args;

use sgint_pipeline::ActionKind;

use super::TargetArgs;
use crate::cli::Cli;

/// Build, then open the editor or the exported Xcode project
#[derive(Debug, Args)]
pub struct RunCommand {
    #[command(flatten)]
    pub target: TargetArgs,
}

impl RunCommand {
    /// Execute the run command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        self.target.execute(cli, ActionKind::Run)
    }
}
