//! Status command implementation
//!
//! Lists the generated sources that still lack a preview image.

use anyhow::{Context, Result};
use colored::Colorize;
use lilyglyphs_backend_lilypond::pending_sources;
use std::process::ExitCode;

use crate::workspace::Session;

/// Run the status command
///
/// # Returns
/// Exit code: always 0 once the directories could be listed
pub fn run(session: &Session, json: bool) -> Result<ExitCode> {
    let pending = pending_sources(&session.layout)?;

    if json {
        let value = serde_json::json!({
            "root": session.layout.root.display().to_string(),
            "pending": pending,
        });
        let text = serde_json::to_string_pretty(&value).context("Failed to serialize status")?;
        println!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{} {}",
        "Workspace:".cyan().bold(),
        session.layout.root.display()
    );
    if pending.is_empty() {
        println!("  {} All preview images are up to date", "ok".green());
    } else {
        println!("  {} {} source(s) without image:", "!!".yellow(), pending.len());
        for name in &pending {
            println!("     {}", name);
        }
    }
    Ok(ExitCode::SUCCESS)
}
