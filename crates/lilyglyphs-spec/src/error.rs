//! Error types for definitions loading and workspace location.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for definitions and layout operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors raised while locating the workspace or reading definitions.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The current directory has no ancestor named after the package.
    #[error("current directory {cwd} is not inside a '{package}' workspace")]
    NotInWorkspace { cwd: PathBuf, package: String },

    /// The definitions source does not exist.
    #[error("definitions file {path} not found")]
    DefinitionsNotFound { path: PathBuf },

    /// Failed to read the definitions source.
    #[error("failed to read definitions file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A command name was defined twice.
    #[error("line {line}: command '{name}' is already defined")]
    DuplicateCommand { name: String, line: usize },

    /// A command header had no usable name.
    #[error("line {line}: command definition has an empty name")]
    EmptyCommandName { line: usize },

    /// A comment block or command body was never closed.
    #[error("line {line}: unterminated {what}")]
    Unterminated { what: &'static str, line: usize },
}

impl SpecError {
    /// Returns true if this error means the run must stop with status 2.
    ///
    /// These are the environment and missing-input conditions that are
    /// reported before any file is touched.
    pub fn is_environment_error(&self) -> bool {
        matches!(
            self,
            SpecError::NotInWorkspace { .. } | SpecError::DefinitionsNotFound { .. }
        )
    }
}

/// Common interface for the error types of every pipeline stage.
///
/// Each stage has its own error enum; this trait exposes a stable code and a
/// category so the CLI can report them uniformly.
///
/// # Example
///
/// ```
/// use lilyglyphs_spec::error::{BackendError, SpecError};
///
/// fn describe<E: BackendError>(err: &E) -> String {
///     format!("[{}] {}", err.code(), err.message())
/// }
///
/// let err = SpecError::EmptyCommandName { line: 3 };
/// assert!(describe(&err).starts_with("[SPEC_005]"));
/// ```
pub trait BackendError: std::error::Error {
    /// Stable error code such as "SPEC_001" or "LILYPOND_004".
    fn code(&self) -> &'static str;

    /// Human-readable message, usually the `Display` output.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Error category, e.g. "spec", "lilypond" or "latex".
    fn category(&self) -> &'static str;
}

impl BackendError for SpecError {
    fn code(&self) -> &'static str {
        match self {
            SpecError::NotInWorkspace { .. } => "SPEC_001",
            SpecError::DefinitionsNotFound { .. } => "SPEC_002",
            SpecError::ReadFailed { .. } => "SPEC_003",
            SpecError::DuplicateCommand { .. } => "SPEC_004",
            SpecError::EmptyCommandName { .. } => "SPEC_005",
            SpecError::Unterminated { .. } => "SPEC_006",
        }
    }

    fn category(&self) -> &'static str {
        "spec"
    }
}
