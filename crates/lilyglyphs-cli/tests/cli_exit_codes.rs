//! Exit status tests for the `lilyglyphs` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lilyglyphs"))
        .args(args)
        .current_dir(dir)
        .env_remove("LILYPOND_PATH")
        .output()
        .expect("failed to run lilyglyphs binary")
}

fn workspace() -> (tempfile::TempDir, std::path::PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path().join("lilyglyphs");
    fs::create_dir_all(root.join("definitions")).unwrap();
    (tmp, root)
}

#[test]
fn test_missing_definitions_exits_with_two() {
    let (_tmp, root) = workspace();

    let output = run_in(&root, &["image-commands", "does-not-exist.ly"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.ly"), "stderr: {}", stderr);
    assert!(stderr.contains("[SPEC_002]"), "stderr: {}", stderr);
    assert!(!root.join("stash_new_commands").exists());
    assert!(!root.join("generated_src").exists());
}

#[test]
fn test_outside_workspace_exits_with_two() {
    let tmp = tempfile::tempdir().unwrap();
    let elsewhere = tmp.path().join("not-the-package");
    fs::create_dir_all(&elsewhere).unwrap();
    if elsewhere.components().any(|c| c.as_os_str() == "lilyglyphs") {
        eprintln!("temporary directory lies inside a lilyglyphs tree; skipping");
        return;
    }

    let output = run_in(&elsewhere, &["status"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("lilyglyphs"), "stderr: {}", stderr);
    assert!(stderr.contains("[SPEC_001]"), "stderr: {}", stderr);
}

#[test]
fn test_skip_compile_writes_document() {
    let (_tmp, root) = workspace();
    fs::write(
        root.join("definitions").join("dynamics.ly"),
        "%{ Forte %}\ndynamicF = {\n  \\dynamic f\n}\n",
    )
    .unwrap();

    let output = run_in(
        &root.join("definitions"),
        &["image-commands", "dynamics.ly", "--skip-compile"],
    );

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(root.join("generated_src").join("dynamicF.ly").is_file());
    let document = fs::read_to_string(root.join("stash_new_commands").join("dynamics.tex")).unwrap();
    assert!(document.contains(r"\dynamicF & \cmd{dynamicF} & description\\"));
}

#[test]
fn test_status_json_lists_pending_sources() {
    let (_tmp, root) = workspace();
    fs::create_dir_all(root.join("generated_src")).unwrap();
    fs::create_dir_all(root.join("pdfs")).unwrap();
    fs::write(root.join("generated_src").join("segno.ly"), "").unwrap();

    let output = run_in(&root, &["status", "--json"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["pending"], serde_json::json!(["segno"]));
}
