//! Compile command implementation
//!
//! Compiles every generated source that has no preview image yet and moves
//! the preview images into place.

use anyhow::{Context, Result};
use colored::Colorize;
use lilyglyphs_backend_lilypond::build_missing;
use std::process::ExitCode;

use super::reporting::print_build_summary;
use super::CompilerOptions;
use crate::workspace::Session;

/// Run the compile command
///
/// # Arguments
/// * `session` - The located workspace
/// * `compiler` - LilyPond location and time limit
/// * `fail_fast` - Stop at the first failed source
/// * `json` - Print the build summary as JSON instead of text
///
/// # Returns
/// Exit code: 0 success, 1 if any source failed to compile
pub fn run(
    session: &Session,
    compiler: &CompilerOptions,
    fail_fast: bool,
    json: bool,
) -> Result<ExitCode> {
    let layout = &session.layout;
    layout
        .create_output_dirs()
        .context("Failed to create output directories")?;

    if !json {
        println!("{}", "Compiling with LilyPond:".cyan().bold());
    }
    let summary = build_missing(layout, &compiler.orchestrator(), fail_fast)?;

    if json {
        let text =
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", text);
    } else {
        print_build_summary(&summary, &layout.root);
    }

    if summary.has_failures() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
