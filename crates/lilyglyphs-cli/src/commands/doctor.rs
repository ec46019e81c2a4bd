//! Doctor command implementation
//!
//! Checks the LilyPond installation and the workspace directories.

use anyhow::Result;
use colored::Colorize;
use lilyglyphs_backend_lilypond::Orchestrator;
use lilyglyphs_spec::WorkspaceLayout;
use std::env;
use std::path::Path;
use std::process::{Command, ExitCode};

use super::CompilerOptions;

/// Run the doctor command
///
/// Checks:
/// - LilyPond installation
/// - Workspace location
/// - Workspace directories
///
/// # Returns
/// Exit code: 0 if all checks pass, 1 if any fail
pub fn run(compiler: &CompilerOptions) -> Result<ExitCode> {
    println!("{}", "lilyglyphs Doctor".cyan().bold());
    println!("{}", "=================".cyan());
    println!();

    let mut all_ok = true;

    println!("{}", "Versions:".bold());
    println!(
        "  {} lilyglyphs-cli v{}",
        "->".green(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("{}", "Dependencies:".bold());
    match check_lilypond(&compiler.orchestrator()) {
        LilypondStatus::Found { path, version } => {
            println!(
                "  {} LilyPond {} ({})",
                "ok".green(),
                version,
                path.display()
            );
        }
        LilypondStatus::NotFound => {
            println!("  {} LilyPond not found", "!!".red());
            println!(
                "     {}",
                "LilyPond is required to compile preview images.".dimmed()
            );
            println!(
                "     {}",
                "Install from https://lilypond.org/download.html or set LILYPOND_PATH".dimmed()
            );
            all_ok = false;
        }
        LilypondStatus::Error(e) => {
            println!("  {} LilyPond check failed: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    println!("{}", "Workspace:".bold());
    match env::current_dir() {
        Ok(cwd) => match WorkspaceLayout::locate(&cwd) {
            Ok(layout) => {
                println!("  {} Root: {}", "ok".green(), layout.root.display());
                for (label, dir) in layout.directories() {
                    if dir.is_dir() {
                        println!("  {} {}/", "ok".green(), label);
                    } else {
                        println!("  {} {}/ (missing, created on demand)", "!!".yellow(), label);
                    }
                }
            }
            Err(e) => {
                println!("  {} {}", "!!".red(), e);
                all_ok = false;
            }
        },
        Err(e) => {
            println!("  {} Cannot determine current directory: {}", "!!".red(), e);
            all_ok = false;
        }
    }
    println!();

    if all_ok {
        println!("{} All checks passed!", "SUCCESS".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} Some checks failed. See above for details.",
            "WARNING".yellow().bold()
        );
        Ok(ExitCode::from(1))
    }
}

/// Status of LilyPond installation check
enum LilypondStatus {
    Found {
        path: std::path::PathBuf,
        version: String,
    },
    NotFound,
    Error(String),
}

/// Parses "GNU LilyPond 2.24.1" from the first line of `lilypond --version`.
fn parse_lilypond_version(output: &str) -> Option<String> {
    output
        .lines()
        .next()
        .and_then(|line| line.trim().strip_prefix("GNU LilyPond "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(|v| v.to_string())
}

fn check_lilypond(orchestrator: &Orchestrator) -> LilypondStatus {
    let path = match orchestrator.find_lilypond() {
        Ok(path) => path,
        Err(_) => return LilypondStatus::NotFound,
    };
    query_version(&path)
}

fn query_version(path: &Path) -> LilypondStatus {
    match Command::new(path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            LilypondStatus::Found {
                path: path.to_path_buf(),
                version: parse_lilypond_version(&stdout).unwrap_or_else(|| "unknown".to_string()),
            }
        }
        Ok(output) => {
            LilypondStatus::Error(format!("LilyPond exited with status: {}", output.status))
        }
        Err(e) => LilypondStatus::Error(e.to_string()),
    }
}
