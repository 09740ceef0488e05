//! CLI commands

mod build;
mod export;
mod init;
mod run;
mod stamp;
mod target;

pub use build::BuildCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use run::RunCommand;
pub use stamp::StampCommand;
pub use target::{PlatformArg, TargetArgs};
