//! lilyglyphs CLI library.
//!
//! This crate wires the definitions reader, the LilyPond backend and the
//! LaTeX generator into the `lilyglyphs` command-line tool.

pub mod commands;
pub mod workspace;

use lilyglyphs_backend_lilypond::LilypondError;
use lilyglyphs_latex::LatexError;
use lilyglyphs_spec::{BackendError, SpecError};
use std::process::ExitCode;

/// Exit status for environment and missing-input errors.
pub const ENVIRONMENT_EXIT_CODE: u8 = 2;

/// Maps a command error to the process exit status.
///
/// Running outside the workspace or naming a missing definitions file exits
/// with 2; every other error exits with 1.
pub fn exit_status_for(err: &anyhow::Error) -> u8 {
    let environment = err.chain().any(|cause| {
        cause
            .downcast_ref::<SpecError>()
            .is_some_and(SpecError::is_environment_error)
    });
    if environment {
        ENVIRONMENT_EXIT_CODE
    } else {
        1
    }
}

/// Stable code of the first library error in the chain, e.g. `LILYPOND_004`.
pub fn error_code_for(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<SpecError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<LilypondError>() {
            Some(e.code())
        } else {
            cause.downcast_ref::<LatexError>().map(|e| e.code())
        }
    })
}

/// Formats an error for the terminal: `[CODE] message: cause: ...`.
pub fn describe_error(err: &anyhow::Error) -> String {
    match error_code_for(err) {
        Some(code) => format!("[{}] {:#}", code, err),
        None => format!("{:#}", err),
    }
}

/// [`exit_status_for`] as an [`ExitCode`].
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}
