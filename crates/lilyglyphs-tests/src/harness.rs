//! Test harness for building throwaway lilyglyphs workspaces.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use lilyglyphs_backend_lilypond::{Orchestrator, OrchestratorConfig};
use lilyglyphs_cli::workspace::Session;
use lilyglyphs_spec::{WorkspaceLayout, PACKAGE_NAME};
use tempfile::TempDir;

/// Names containing this marker make the stand-in compiler exit with status 1.
pub const FAILING_NAME_MARKER: &str = "broken";

/// Names containing this marker compile "successfully" without a preview image.
pub const MISSING_PREVIEW_MARKER: &str = "nopreview";

/// Names containing this marker make the stand-in compiler hang.
pub const HANGING_NAME_MARKER: &str = "hangs";

/// Stand-in for `lilypond -o <dir> -dpreview -dno-point-and-click <dir>/<name>.ly`.
///
/// Produces the full-page image, the preview image and a log, which is what
/// a real preview compile leaves behind in the output directory.
const FAKE_LILYPOND: &str = r#"#!/bin/sh
out="$2"
src="$5"
name=$(basename "$src" .ly)
echo "Processing \`$src'" >&2
case "$name" in
  *hangs*)
    exec sleep 30
    ;;
  *broken*)
    echo "$src:2:3: error: syntax error, unexpected '}'" >&2
    exit 1
    ;;
esac
echo "%PDF-1.4 $name" > "$out/$name.pdf"
echo "log" > "$out/$name.log"
echo "eps" > "$out/$name.preview.eps"
case "$name" in
  *nopreview*) ;;
  *) echo "%PDF-1.4 $name preview" > "$out/$name.preview.pdf" ;;
esac
exit 0
"#;

/// A temporary `lilyglyphs` package tree.
pub struct TestWorkspace {
    /// Keeps the temporary directory alive.
    pub temp: TempDir,
    pub layout: WorkspaceLayout,
}

impl TestWorkspace {
    /// Creates `<tmp>/lilyglyphs/definitions/`.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create work dir");
        let root = temp.path().join(PACKAGE_NAME);
        let layout = WorkspaceLayout::from_root(&root);
        fs::create_dir_all(&layout.definitions_dir).expect("Failed to create definitions dir");
        Self { temp, layout }
    }

    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    /// Writes `definitions/<file_name>` and returns its path.
    pub fn write_definitions(&self, file_name: &str, text: &str) -> PathBuf {
        let path = self.layout.definitions_dir.join(file_name);
        fs::write(&path, text).expect("Failed to write definitions");
        path
    }

    /// A session as if the tool had been started in `definitions/`.
    pub fn session(&self) -> Session {
        Session::locate(&self.layout.definitions_dir).expect("Failed to locate workspace")
    }

    /// Installs the stand-in compiler next to the workspace and returns its path.
    #[cfg(unix)]
    pub fn install_fake_lilypond(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.temp.path().join("bin");
        fs::create_dir_all(&bin).expect("Failed to create bin dir");
        let path = bin.join("lilypond");
        fs::write(&path, FAKE_LILYPOND).expect("Failed to write fake lilypond");
        let mut perms = fs::metadata(&path).expect("stat fake lilypond").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod fake lilypond");
        path
    }

    /// An orchestrator that runs the stand-in compiler.
    #[cfg(unix)]
    pub fn fake_orchestrator(&self) -> Orchestrator {
        Orchestrator::with_config(
            OrchestratorConfig::default()
                .lilypond_path(self.install_fake_lilypond())
                .capture_output(true),
        )
    }

    /// An orchestrator that runs the stand-in compiler with a time limit.
    #[cfg(unix)]
    pub fn fake_orchestrator_with_timeout(&self, secs: u64) -> Orchestrator {
        Orchestrator::with_config(
            OrchestratorConfig::default()
                .lilypond_path(self.install_fake_lilypond())
                .capture_output(true)
                .timeout_secs(secs),
        )
    }

    /// Sorted file names in `dir`, empty when it does not exist.
    pub fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    pub fn source_listing(&self) -> Vec<String> {
        Self::listing(&self.layout.source_dir)
    }

    pub fn image_listing(&self) -> Vec<String> {
        Self::listing(&self.layout.image_dir)
    }

    /// Contents of `stash_new_commands/<file_name>`.
    pub fn read_stash(&self, file_name: &str) -> String {
        fs::read_to_string(self.layout.stash_path(file_name)).expect("Failed to read document")
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if LilyPond is available in the environment.
pub fn is_lilypond_available() -> bool {
    Command::new("lilypond")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check if real LilyPond tests should run based on environment variable.
pub fn should_run_lilypond_tests() -> bool {
    std::env::var("LILYGLYPHS_RUN_LILYPOND_TESTS")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
