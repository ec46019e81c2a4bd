//! lilyglyphs LilyPond Backend
//!
//! This crate turns the embedded scores of a definitions source into the
//! cropped preview images that the LaTeX commands include.
//!
//! # Overview
//!
//! The backend works on the fixed directories of a [`WorkspaceLayout`]:
//!
//! 1. **Sources** - [`source`] writes `generated_src/<name>.ly` per command
//! 2. **Reconciliation** - [`reconcile`] lists sources without an image in `pdfs/`
//! 3. **Compilation** - [`orchestrator`] runs LilyPond once per pending source
//! 4. **Cleanup** - [`cleanup`] deletes byproducts and moves preview images into place
//!
//! Compilation is sequential and blocking. Each source yields a
//! [`CompileOutcome`]; only compiled names are handed to cleanup.
//!
//! # LilyPond Requirements
//!
//! The orchestrator searches for LilyPond in:
//!
//! 1. An explicit path in [`OrchestratorConfig`]
//! 2. `LILYPOND_PATH` environment variable
//! 3. System PATH
//!
//! # Example
//!
//! ```ignore
//! use lilyglyphs_backend_lilypond::{build_missing, Orchestrator};
//! use lilyglyphs_spec::WorkspaceLayout;
//!
//! let layout = WorkspaceLayout::locate(&std::env::current_dir()?)?;
//! let summary = build_missing(&layout, &Orchestrator::new(), false)?;
//! println!("installed {} image(s)", summary.cleanup.installed.len());
//! ```

pub mod cleanup;
pub mod error;
pub mod orchestrator;
pub mod reconcile;
pub mod source;

use lilyglyphs_spec::WorkspaceLayout;
use serde::Serialize;

pub use cleanup::CleanupSummary;
pub use error::{LilypondError, LilypondResult};
pub use orchestrator::{CompileOutcome, CompileReport, Orchestrator, OrchestratorConfig};
pub use reconcile::pending_sources;
pub use source::{render_score_source, write_score_sources};

/// Result of reconciling, compiling and cleaning up in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildSummary {
    /// Sources that lacked an image before the run.
    pub pending: Vec<String>,
    /// Per-source compilation outcomes.
    pub report: CompileReport,
    /// Files removed and installed by cleanup.
    pub cleanup: CleanupSummary,
}

impl BuildSummary {
    pub fn has_failures(&self) -> bool {
        self.report.has_failures()
    }
}

/// Compiles every pending source and installs the resulting preview images.
///
/// Without `fail_fast`, sources that fail to compile are skipped: their
/// byproducts are still removed but no image is installed for them.
pub fn build_missing(
    layout: &WorkspaceLayout,
    orchestrator: &Orchestrator,
    fail_fast: bool,
) -> LilypondResult<BuildSummary> {
    let pending = pending_sources(layout)?;
    if pending.is_empty() {
        log::info!("no pending sources");
        return Ok(BuildSummary::default());
    }

    let report = orchestrator.compile_all(layout, &pending, fail_fast)?;
    let cleanup = cleanup::cleanup(layout, &report.compiled_names())?;

    Ok(BuildSummary {
        pending,
        report,
        cleanup,
    })
}
