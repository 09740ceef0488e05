//! CLI definition and command handling

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use sgint_core::config::load_settings_or_default;
use sgint_pipeline::Invocation;

use commands::{BuildCommand, ExportCommand, InitCommand, RunCommand, StampCommand};

/// sgint - Build, run and export Swift Godot drivers
#[derive(Debug, Parser)]
#[command(name = "sgint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Godot project directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Path to Godot.app
    #[arg(long, global = true, env = "SGINT_GODOT_PATH")]
    pub godot_path: Option<PathBuf>,

    /// Project name; the driver package is `<name>Driver`
    #[arg(long, global = true)]
    pub project_name: Option<String>,

    /// Build number stamped into export_presets.cfg before building
    #[arg(short = 'b', long, global = true)]
    pub build_number: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new driver package
    Init(InitCommand),

    /// Build the driver and stage it into bin/
    Build(BuildCommand),

    /// Build, then open the editor or the exported Xcode project
    Run(RunCommand),

    /// Build, then export a package with Godot
    Export(ExportCommand),

    /// Stamp a build number into export_presets.cfg
    Stamp(StampCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Init(ref cmd) => cmd.execute(&self),
            Commands::Build(ref cmd) => cmd.execute(&self),
            Commands::Run(ref cmd) => cmd.execute(&self),
            Commands::Export(ref cmd) => cmd.execute(&self),
            Commands::Stamp(ref cmd) => cmd.execute(&self),
        }
    }

    /// Whether human-readable progress should be printed
    pub fn prints_text(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }

    /// Godot project directory, absolute
    pub fn working_dir(&self) -> anyhow::Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        Ok(match &self.directory {
            Some(dir) => cwd.join(dir),
            None => cwd,
        })
    }

    /// Settings merged with the global flags
    pub fn invocation(&self) -> anyhow::Result<Invocation> {
        let dir = self.working_dir()?;
        let (settings, settings_path) = load_settings_or_default(&dir)?;
        if let Some(path) = &settings_path {
            debug!(path = %path.display(), "loaded settings");
        }

        let mut invocation = Invocation::from_settings(&dir, &settings);
        if let Some(name) = &self.project_name {
            invocation = invocation.with_project_name(name);
        }
        if let Some(path) = &self.godot_path {
            invocation = invocation.with_godot_path(path);
        }
        if let Some(build_number) = self.build_number {
            invocation = invocation.with_build_number(build_number);
        }
        Ok(invocation)
    }
}
