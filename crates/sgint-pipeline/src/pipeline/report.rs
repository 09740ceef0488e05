//! Pipeline stages and run reports

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifacts::StagedArtifact;
use crate::platform::{ActionKind, PlatformKind};

/// Where a pipeline run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineStage {
    Idle,
    Resolving,
    Building,
    ArtifactStaging,
    DescriptorWritten,
    ConfigPatched,
    Exporting,
    ConfigRestored,
    Launching,
    Scaffolding,
    Done,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Building => "building",
            Self::ArtifactStaging => "artifact-staging",
            Self::DescriptorWritten => "descriptor-written",
            Self::ConfigPatched => "config-patched",
            Self::Exporting => "exporting",
            Self::ConfigRestored => "config-restored",
            Self::Launching => "launching",
            Self::Scaffolding => "scaffolding",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful pipeline run did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    /// Target platform; scaffolding has none
    pub platform: Option<PlatformKind>,

    pub action: ActionKind,

    pub project_name: Option<String>,

    /// Stages entered, in order
    pub stages: Vec<PipelineStage>,

    /// Binaries copied into `bin/`
    pub artifacts: Vec<StagedArtifact>,

    /// Extension descriptor that was written
    pub descriptor: Option<PathBuf>,

    /// Package produced by the engine export
    pub export_path: Option<PathBuf>,

    /// Files created by scaffolding
    pub created: Vec<PathBuf>,

    pub duration_ms: u64,
}

impl PipelineReport {
    pub fn new(platform: Option<PlatformKind>, action: ActionKind) -> Self {
        Self {
            platform,
            action,
            project_name: None,
            stages: vec![PipelineStage::Idle],
            artifacts: Vec::new(),
            descriptor: None,
            export_path: None,
            created: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Stage the run is currently in
    pub fn stage(&self) -> PipelineStage {
        self.stages.last().copied().unwrap_or(PipelineStage::Idle)
    }

    pub fn entered(&self, stage: PipelineStage) -> bool {
        self.stages.contains(&stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_is_idle() {
        let report = PipelineReport::new(Some(PlatformKind::Desktop), ActionKind::Build);
        assert_eq!(report.stage(), PipelineStage::Idle);
        assert!(!report.entered(PipelineStage::Building));
    }

    #[test]
    fn test_stage_names_are_kebab_case() {
        assert_eq!(PipelineStage::ArtifactStaging.to_string(), "artifact-staging");
        assert_eq!(PipelineStage::ConfigRestored.as_str(), "config-restored");
    }
}
