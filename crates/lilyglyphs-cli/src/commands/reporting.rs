use colored::Colorize;
use lilyglyphs_backend_lilypond::{BuildSummary, CompileOutcome};
use std::path::Path;

/// Print the outcome of a reconcile/compile/cleanup pass.
pub(crate) fn print_build_summary(summary: &BuildSummary, root: &Path) {
    if summary.pending.is_empty() {
        println!("  {} All preview images are up to date", "ok".green());
        return;
    }

    for (name, outcome) in &summary.report.results {
        match outcome {
            CompileOutcome::Compiled => println!("  {} {}", "ok".green(), name),
            CompileOutcome::Failed { stderr, .. } => {
                println!("  {} {} ({})", "!!".red(), name, failure_text(outcome));
                for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
                    println!("     {}", line.dimmed());
                }
            }
            CompileOutcome::MissingOutput { .. } | CompileOutcome::TimedOut { .. } => {
                println!("  {} {} ({})", "!!".red(), name, failure_text(outcome));
            }
        }
    }

    println!(
        "  {} removed {} intermediate file(s), installed {} image(s)",
        "->".green(),
        summary.cleanup.removed.len(),
        summary.cleanup.installed.len()
    );
    for path in &summary.cleanup.installed {
        println!("     {}", display_relative(path, root).dimmed());
    }
}

fn failure_text(outcome: &CompileOutcome) -> String {
    outcome.failure_detail().unwrap_or_default()
}

/// Path shown relative to the workspace root when possible.
pub(crate) fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
