//! Error types for the LilyPond backend.

use lilyglyphs_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for LilyPond backend operations.
pub type LilypondResult<T> = Result<T, LilypondError>;

/// Errors that can occur while compiling preview images.
#[derive(Debug, Error)]
pub enum LilypondError {
    /// LilyPond executable not found.
    #[error("LilyPond executable not found. Ensure LilyPond is installed and in PATH, or set LILYPOND_PATH environment variable")]
    LilypondNotFound,

    /// Failed to spawn LilyPond process.
    #[error("Failed to spawn LilyPond process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// LilyPond process timed out.
    #[error("LilyPond process timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Compilation of a source failed and the run was asked to stop.
    #[error("Compilation of '{name}' failed: {detail}")]
    CompileFailed { name: String, detail: String },

    /// A file the compiler should have produced is absent.
    #[error("Expected compiler output not found: {path}")]
    MissingOutput { path: PathBuf },

    /// Failed to list a directory.
    #[error("Failed to list directory {path}: {source}")]
    ListDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a generated source file.
    #[error("Failed to write source {path}: {source}")]
    WriteSourceFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to delete a file.
    #[error("Failed to remove {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the preview image into place.
    #[error("Failed to move {from} to {to}: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LilypondError {
    /// Creates a new compile failed error.
    pub fn compile_failed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CompileFailed {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

impl BackendError for LilypondError {
    fn code(&self) -> &'static str {
        match self {
            LilypondError::LilypondNotFound => "LILYPOND_001",
            LilypondError::SpawnFailed(_) => "LILYPOND_002",
            LilypondError::Timeout { .. } => "LILYPOND_003",
            LilypondError::CompileFailed { .. } => "LILYPOND_004",
            LilypondError::MissingOutput { .. } => "LILYPOND_005",
            LilypondError::ListDirFailed { .. } => "LILYPOND_006",
            LilypondError::WriteSourceFailed { .. } => "LILYPOND_007",
            LilypondError::RemoveFailed { .. } => "LILYPOND_008",
            LilypondError::RenameFailed { .. } => "LILYPOND_009",
        }
    }

    fn category(&self) -> &'static str {
        "lilypond"
    }
}
