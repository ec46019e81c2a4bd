//! End-to-End Build Pipeline Tests for lilyglyphs
//!
//! Definitions are turned into sources, compiled with a scripted stand-in
//! for LilyPond and cleaned up, as the `image-commands` command does it.
//!
//! ```bash
//! cargo test -p lilyglyphs-tests --test e2e_pipeline
//! ```

#![cfg(unix)]

use std::fs;
use std::process::ExitCode;

use lilyglyphs_backend_lilypond::{build_missing, write_score_sources, CompileOutcome, LilypondError};
use lilyglyphs_cli::commands::image_commands::{self, Options};
use lilyglyphs_cli::commands::CompilerOptions;
use lilyglyphs_spec::{CommandSet, DefinitionsRecord};
use lilyglyphs_backend_lilypond::Orchestrator;
use lilyglyphs_tests::{is_lilypond_available, should_run_lilypond_tests, TestWorkspace};
use pretty_assertions::assert_eq;

const ARTICULATIONS: &str = r#"\version "2.16.0"

%{
  Fermata
  template: image
%}
fermata = {
  \fermata
}

%{ Segno sign %}
segno = {
  \segno
}
"#;

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names
}

fn prepare(workspace: &TestWorkspace, text: &str) -> CommandSet {
    let path = workspace.write_definitions("defs.ly", text);
    let record = DefinitionsRecord::read(&path).unwrap();
    let commands = CommandSet::parse(&record).unwrap();
    workspace.layout.create_output_dirs().unwrap();
    write_score_sources(&workspace.layout, &commands).unwrap();
    commands
}

// ============================================================================
// Reconcile, compile, clean up
// ============================================================================

/// Every source compiles and ends up as a single image in pdfs/.
#[test]
fn test_build_installs_preview_images() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, ARTICULATIONS);

    let summary = build_missing(&workspace.layout, &workspace.fake_orchestrator(), false).unwrap();

    assert_eq!(sorted(summary.pending.clone()), vec!["fermata", "segno"]);
    assert!(!summary.has_failures());
    assert_eq!(workspace.image_listing(), vec!["fermata.pdf", "segno.pdf"]);
    assert_eq!(workspace.source_listing(), vec!["fermata.ly", "segno.ly"]);

    let image = fs::read_to_string(workspace.layout.final_image("fermata")).unwrap();
    assert!(image.contains("preview"), "installed image is not the preview");
    assert_eq!(summary.cleanup.installed.len(), 2);
    // log and eps for each source
    assert_eq!(summary.cleanup.removed.len(), 4);
}

/// A second run finds nothing to do.
#[test]
fn test_reconcile_is_idempotent() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, ARTICULATIONS);
    let orchestrator = workspace.fake_orchestrator();

    build_missing(&workspace.layout, &orchestrator, false).unwrap();
    let second = build_missing(&workspace.layout, &orchestrator, false).unwrap();

    assert!(second.pending.is_empty());
    assert!(second.report.results.is_empty());
    assert_eq!(workspace.image_listing(), vec!["fermata.pdf", "segno.pdf"]);
}

/// Only sources without an image are compiled.
#[test]
fn test_existing_images_are_not_recompiled() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, ARTICULATIONS);
    fs::write(workspace.layout.final_image("fermata"), "hand-made").unwrap();

    let summary = build_missing(&workspace.layout, &workspace.fake_orchestrator(), false).unwrap();

    assert_eq!(summary.pending, vec!["segno"]);
    assert_eq!(
        fs::read_to_string(workspace.layout.final_image("fermata")).unwrap(),
        "hand-made"
    );
}

// ============================================================================
// Failure handling
// ============================================================================

/// A failing source is skipped, the others still get their images.
#[test]
fn test_failed_source_is_skipped() {
    let workspace = TestWorkspace::new();
    prepare(
        &workspace,
        "%{ Coda %}\ncoda = {\n  \\coda\n}\nbrokenGlyph = {\n  \\notAThing\n}\n",
    );

    let summary = build_missing(&workspace.layout, &workspace.fake_orchestrator(), false).unwrap();

    assert!(summary.has_failures());
    let failures: Vec<&str> = summary.report.failures().map(|(name, _)| name).collect();
    assert_eq!(failures, vec!["brokenGlyph"]);
    match &summary.report.results.iter().find(|(n, _)| n == "brokenGlyph").unwrap().1 {
        CompileOutcome::Failed { exit_code, stderr } => {
            assert_eq!(*exit_code, 1);
            assert!(stderr.contains("syntax error"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(workspace.image_listing(), vec!["coda.pdf"]);
    assert_eq!(workspace.source_listing(), vec!["brokenGlyph.ly", "coda.ly"]);
}

/// A compile that exits cleanly without a preview is reported, not installed.
#[test]
fn test_missing_preview_is_reported() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, "nopreviewGlyph = {\n  c'4\n}\n");

    let summary = build_missing(&workspace.layout, &workspace.fake_orchestrator(), false).unwrap();

    match &summary.report.results[0].1 {
        CompileOutcome::MissingOutput { path } => {
            assert_eq!(path, &workspace.layout.preview_image("nopreviewGlyph"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert!(workspace.image_listing().is_empty());
}

/// With fail-fast the first failure aborts before cleanup.
#[test]
fn test_fail_fast_aborts() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, "brokenGlyph = {\n  \\notAThing\n}\n");

    let err = build_missing(&workspace.layout, &workspace.fake_orchestrator(), true).unwrap_err();

    assert!(
        matches!(err, LilypondError::CompileFailed { ref name, .. } if name == "brokenGlyph"),
        "unexpected error: {}",
        err
    );
    assert!(workspace.image_listing().is_empty());
}

/// A hanging compile is killed and skipped; the rest of the batch is installed.
#[test]
fn test_timed_out_source_is_skipped() {
    let workspace = TestWorkspace::new();
    prepare(
        &workspace,
        "coda = {\n  \\coda\n}\nhangsForever = {\n  c'1\n}\nsegno = {\n  \\segno\n}\n",
    );

    let summary = build_missing(
        &workspace.layout,
        &workspace.fake_orchestrator_with_timeout(1),
        false,
    )
    .unwrap();

    let failures: Vec<(&str, &CompileOutcome)> = summary.report.failures().collect();
    assert_eq!(
        failures,
        vec![("hangsForever", &CompileOutcome::TimedOut { timeout_secs: 1 })]
    );
    assert_eq!(workspace.image_listing(), vec!["coda.pdf", "segno.pdf"]);
    assert_eq!(
        workspace.source_listing(),
        vec!["coda.ly", "hangsForever.ly", "segno.ly"]
    );
}

/// With fail-fast a hanging compile aborts the run as a timeout.
#[test]
fn test_fail_fast_timeout_aborts() {
    let workspace = TestWorkspace::new();
    prepare(&workspace, "hangsForever = {\n  c'1\n}\n");

    let err = build_missing(
        &workspace.layout,
        &workspace.fake_orchestrator_with_timeout(1),
        true,
    )
    .unwrap_err();

    assert!(
        matches!(err, LilypondError::Timeout { timeout_secs: 1 }),
        "unexpected error: {}",
        err
    );
}

/// Nested music keeps its closing braces in the generated source.
#[test]
fn test_nested_music_compiles() {
    let workspace = TestWorkspace::new();
    let commands = prepare(
        &workspace,
        "%{ Treble clef with a note %}\nclefWithNote = {\n  \\relative c' {\n    \\clef G c4\n  }\n}\n",
    );

    let score = &commands.get("clefWithNote").unwrap().score;
    assert_eq!(score, &vec!["  \\relative c' {", "    \\clef G c4", "  }"]);

    let source = fs::read_to_string(workspace.layout.source_path("clefWithNote")).unwrap();
    assert_eq!(source.matches('{').count(), source.matches('}').count());

    let summary = build_missing(&workspace.layout, &workspace.fake_orchestrator(), false).unwrap();
    assert!(!summary.has_failures());
    assert_eq!(workspace.image_listing(), vec!["clefWithNote.pdf"]);
}

// ============================================================================
// Whole command
// ============================================================================

fn exit_text(code: ExitCode) -> String {
    format!("{:?}", code)
}

fn options(workspace: &TestWorkspace, definitions: &str) -> Options {
    let mut options = Options::new(definitions);
    options.compiler = CompilerOptions {
        lilypond: Some(workspace.install_fake_lilypond()),
        timeout_secs: None,
    };
    options
}

/// The image-commands command leaves sources, images and the document behind.
#[test]
fn test_image_commands_end_to_end() {
    let workspace = TestWorkspace::new();
    workspace.write_definitions("articulations.ly", ARTICULATIONS);

    let code = image_commands::run(&workspace.session(), &options(&workspace, "articulations.ly"))
        .unwrap();

    assert_eq!(exit_text(code), exit_text(ExitCode::SUCCESS));
    assert_eq!(workspace.source_listing(), vec!["fermata.ly", "segno.ly"]);
    assert_eq!(workspace.image_listing(), vec!["fermata.pdf", "segno.pdf"]);

    let document = workspace.read_stash("articulations.tex");
    assert!(document.contains(r"\fermata & \cmd{fermata} & description\\"));
    assert!(document.contains(r"\segno & \cmd{segno} & description\\"));
}

/// A failed compile still yields the document, and the command reports it.
#[test]
fn test_image_commands_with_failure_still_writes_document() {
    let workspace = TestWorkspace::new();
    workspace.write_definitions(
        "mixed.ly",
        "coda = {\n  \\coda\n}\nbrokenGlyph = {\n  \\notAThing\n}\n",
    );

    let code = image_commands::run(&workspace.session(), &options(&workspace, "mixed.ly")).unwrap();

    assert_eq!(exit_text(code), exit_text(ExitCode::from(1)));
    let document = workspace.read_stash("mixed.tex");
    assert!(document.contains(r"\brokenGlyph & \cmd{brokenGlyph} & description\\"));
    assert_eq!(workspace.image_listing(), vec!["coda.pdf"]);
}

/// A missing definitions file stops before anything is written.
#[test]
fn test_image_commands_missing_definitions() {
    let workspace = TestWorkspace::new();

    let err = image_commands::run(&workspace.session(), &options(&workspace, "absent.ly"))
        .unwrap_err();

    assert_eq!(lilyglyphs_cli::exit_status_for(&err), 2);
    assert!(!workspace.layout.stash_dir.exists());
    assert!(!workspace.layout.source_dir.exists());
}

// ============================================================================
// Real LilyPond
// ============================================================================

/// Compiles with the installed LilyPond.
#[test]
#[ignore]
fn test_build_with_real_lilypond() {
    if !should_run_lilypond_tests() || !is_lilypond_available() {
        eprintln!("LilyPond tests disabled; set LILYGLYPHS_RUN_LILYPOND_TESTS=1");
        return;
    }

    let workspace = TestWorkspace::new();
    prepare(&workspace, ARTICULATIONS);

    let summary = build_missing(&workspace.layout, &Orchestrator::new(), false).unwrap();

    assert!(!summary.has_failures(), "{:?}", summary.report);
    assert_eq!(workspace.image_listing(), vec!["fermata.pdf", "segno.pdf"]);
    assert_eq!(workspace.source_listing(), vec!["fermata.ly", "segno.ly"]);
}
