//! Image-commands command implementation
//!
//! Generates LaTeX commands for image glyphs from a definitions source:
//! writes the LilyPond sources, compiles the missing preview images and
//! writes the stash document with definitions, reference table and test code.

use anyhow::{Context, Result};
use colored::Colorize;
use lilyglyphs_backend_lilypond::{build_missing, write_score_sources, BuildSummary};
use lilyglyphs_latex::{assemble, write_document, CommandRenderer, Signature, TemplateRegistry};
use lilyglyphs_spec::{CommandSet, DefinitionsRecord, DEFAULT_TEMPLATE_KIND};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use super::reporting::{display_relative, print_build_summary};
use super::CompilerOptions;
use crate::workspace::{script_name, Session};

/// Options for one image-commands run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Definitions source, relative to the invocation directory or `definitions/`.
    pub definitions: PathBuf,
    /// Document file name inside the stash directory.
    pub output: Option<String>,
    /// Template kind for entries that do not name one.
    pub template: String,
    /// Stop at the first compilation failure.
    pub fail_fast: bool,
    /// Only write sources and the document.
    pub skip_compile: bool,
    pub compiler: CompilerOptions,
}

impl Options {
    pub fn new(definitions: impl Into<PathBuf>) -> Self {
        Self {
            definitions: definitions.into(),
            output: None,
            template: DEFAULT_TEMPLATE_KIND.to_string(),
            fail_fast: false,
            skip_compile: false,
            compiler: CompilerOptions::default(),
        }
    }
}

/// Run the image-commands command
///
/// # Returns
/// Exit code: 0 success, 1 if any source failed to compile
pub fn run(session: &Session, options: &Options) -> Result<ExitCode> {
    let layout = &session.layout;
    let definitions_path = layout.resolve_definitions(&options.definitions, &session.invocation_dir);

    println!(
        "{} {}",
        "Reading definitions:".cyan().bold(),
        display_relative(&definitions_path, &layout.root)
    );
    let record = DefinitionsRecord::read(&definitions_path)?;
    let commands = CommandSet::parse_with_default_kind(&record, &options.template)
        .with_context(|| format!("Failed to parse {}", definitions_path.display()))?;

    let registry = TemplateRegistry::builtin();
    registry.check_kinds(&commands)?;

    if commands.is_empty() {
        println!("  {} No commands defined", "!!".yellow());
    } else {
        println!("  {} {} command(s)", "->".green(), commands.len());
    }

    layout
        .create_output_dirs()
        .context("Failed to create output directories")?;
    let written = write_score_sources(layout, &commands)?;
    println!(
        "  {} {} LilyPond source(s) written",
        "->".green(),
        written.len()
    );

    let summary = if options.skip_compile {
        BuildSummary::default()
    } else {
        println!("{}", "Compiling with LilyPond:".cyan().bold());
        let summary = build_missing(layout, &options.compiler.orchestrator(), options.fail_fast)?;
        print_build_summary(&summary, &layout.root);
        summary
    };

    let signature = Signature::today(script_name());
    let rendered = CommandRenderer::new(&registry, &signature).render_all(&commands)?;
    let document = assemble(&rendered, &signature);

    let file_name = output_file_name(options.output.as_deref(), &definitions_path);
    let path = write_document(layout, &file_name, &document)?;

    if summary.has_failures() {
        println!(
            "{} Wrote {} but some images failed to compile. See above for details.",
            "WARNING".yellow().bold(),
            display_relative(&path, &layout.root)
        );
        Ok(ExitCode::from(1))
    } else {
        println!(
            "{} Wrote {}",
            "SUCCESS".green().bold(),
            display_relative(&path, &layout.root)
        );
        Ok(ExitCode::SUCCESS)
    }
}

/// The explicit output name, or `<definitions stem>.tex`.
fn output_file_name(output: Option<&str>, definitions: &Path) -> String {
    match output {
        Some(name) => name.to_string(),
        None => {
            let stem = definitions
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "new_commands".to_string());
            format!("{}.tex", stem)
        }
    }
}
