//! CLI command implementations

pub mod compile;
pub mod doctor;
pub mod image_commands;
pub mod status;

mod reporting;

use lilyglyphs_backend_lilypond::{Orchestrator, OrchestratorConfig};
use std::path::PathBuf;

/// Compiler settings shared by the commands that run LilyPond.
#[derive(Debug, Clone, Default)]
pub struct CompilerOptions {
    /// Explicit LilyPond executable.
    pub lilypond: Option<PathBuf>,
    /// Per-source time limit in seconds.
    pub timeout_secs: Option<u64>,
}

impl CompilerOptions {
    /// Builds an orchestrator that captures compiler stderr for failure reports.
    pub fn orchestrator(&self) -> Orchestrator {
        let mut config = OrchestratorConfig::default().capture_output(true);
        if let Some(ref path) = self.lilypond {
            config = config.lilypond_path(path);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.timeout_secs(secs);
        }
        Orchestrator::with_config(config)
    }
}
