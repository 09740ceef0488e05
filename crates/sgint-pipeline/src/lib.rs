//! sgint Pipeline - Build, stage and export Swift Godot drivers
//!
//! This crate drives the per-platform pipeline: it compiles the driver package
//! with `swift` or `xcodebuild`, stages the resulting binaries into the Godot
//! project's `bin/` directory, writes the `.gdextension` descriptor and then
//! exports or launches the project through the Godot CLI.
//!
//! ## Platforms
//!
//! - **macOS**: `swift build`, dylibs, `.pkg` export
//! - **iOS device**: `xcodebuild archive`, frameworks, `.xcodeproj` export
//! - **iOS simulator**: as iOS, exported with the compatibility renderer

pub mod artifacts;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod prerequisites;
pub mod render_patch;
pub mod scaffold;

pub use artifacts::{ArtifactKind, StagedArtifact};
pub use context::{ExportPresets, Invocation};
pub use error::{PipelineError, Result};
pub use pipeline::{PipelineReport, PipelineStage, PlatformBuildPipeline};
pub use platform::{ActionKind, BuildMode, PlatformKind};
pub use prerequisites::{check_prerequisites, PrerequisiteStatus, ToolStatus};
pub use render_patch::RenderingMethodPatch;
