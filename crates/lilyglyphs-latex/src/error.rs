//! Error types for template rendering and document output.

use lilyglyphs_spec::BackendError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for LaTeX generation.
pub type LatexResult<T> = Result<T, LatexError>;

/// Errors that can occur while rendering commands or writing the document.
#[derive(Debug, Error)]
pub enum LatexError {
    /// No template is registered under this kind.
    #[error("unknown template kind '{kind}' (registered: {registered})")]
    UnknownTemplateKind { kind: String, registered: String },

    /// The command is not in the command set.
    #[error("unknown command '{name}'")]
    UnknownCommand { name: String },

    /// Failed to write the generated document.
    #[error("failed to write document {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BackendError for LatexError {
    fn code(&self) -> &'static str {
        match self {
            LatexError::UnknownTemplateKind { .. } => "LATEX_001",
            LatexError::UnknownCommand { .. } => "LATEX_002",
            LatexError::WriteFailed { .. } => "LATEX_003",
        }
    }

    fn category(&self) -> &'static str {
        "latex"
    }
}
