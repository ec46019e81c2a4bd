//! LilyPond subprocess orchestrator.
//!
//! Runs the compiler once per pending source, strictly one after the other,
//! and reports a typed outcome for each name.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use lilyglyphs_spec::WorkspaceLayout;
use serde::Serialize;

use crate::error::{LilypondError, LilypondResult};

/// Environment variable that overrides the compiler location.
pub const LILYPOND_PATH_ENV: &str = "LILYPOND_PATH";

/// Configuration for the LilyPond orchestrator.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Path to the LilyPond executable.
    pub lilypond_path: Option<PathBuf>,
    /// Upper bound for a single compilation. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Whether to capture LilyPond's stderr instead of passing it through.
    pub capture_output: bool,
}

impl OrchestratorConfig {
    /// Sets the LilyPond executable path.
    pub fn lilypond_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lilypond_path = Some(path.into());
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Captures stderr so it can be attached to failure outcomes.
    pub fn capture_output(mut self, capture: bool) -> Self {
        self.capture_output = capture;
        self
    }
}

/// Result of compiling a single source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CompileOutcome {
    /// Both the full-page and the preview image were produced.
    Compiled,
    /// The compiler exited with a non-zero status.
    Failed { exit_code: i32, stderr: String },
    /// The compiler exited cleanly but an expected image is absent.
    MissingOutput { path: PathBuf },
    /// The compiler was killed after exceeding the configured timeout.
    TimedOut { timeout_secs: u64 },
}

impl CompileOutcome {
    pub fn is_compiled(&self) -> bool {
        matches!(self, CompileOutcome::Compiled)
    }

    /// One-line description of a failed outcome.
    pub fn failure_detail(&self) -> Option<String> {
        match self {
            CompileOutcome::Compiled => None,
            CompileOutcome::Failed { exit_code, stderr } => {
                let last = stderr.lines().rev().find(|l| !l.trim().is_empty());
                Some(match last {
                    Some(line) => format!("exit status {}: {}", exit_code, line.trim()),
                    None => format!("exit status {}", exit_code),
                })
            }
            CompileOutcome::MissingOutput { path } => {
                Some(format!("expected output not found: {}", path.display()))
            }
            CompileOutcome::TimedOut { timeout_secs } => {
                Some(format!("timed out after {} seconds", timeout_secs))
            }
        }
    }
}

/// Outcomes of a batch compilation, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub results: Vec<(String, CompileOutcome)>,
}

impl CompileReport {
    /// Names whose images were produced.
    pub fn compiled_names(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_compiled())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Names that failed, with their outcome.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &CompileOutcome)> {
        self.results
            .iter()
            .filter(|(_, outcome)| !outcome.is_compiled())
            .map(|(name, outcome)| (name.as_str(), outcome))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// The LilyPond subprocess orchestrator.
pub struct Orchestrator {
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Creates a new orchestrator with default configuration.
    pub fn new() -> Self {
        Self::with_config(OrchestratorConfig::default().capture_output(true))
    }

    /// Creates a new orchestrator with the given configuration.
    pub fn with_config(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Finds the LilyPond executable path.
    pub fn find_lilypond(&self) -> LilypondResult<PathBuf> {
        // Check config override first
        if let Some(ref path) = self.config.lilypond_path {
            if path.exists() {
                return Ok(path.clone());
            }
            if let Ok(found) = which::which(path) {
                return Ok(found);
            }
        }

        if let Ok(path) = std::env::var(LILYPOND_PATH_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
        }

        let names = if cfg!(windows) {
            vec!["lilypond.exe", "lilypond"]
        } else {
            vec!["lilypond"]
        };
        for name in names {
            if let Ok(path) = which::which(name) {
                return Ok(path);
            }
        }

        Err(LilypondError::LilypondNotFound)
    }

    /// Builds the compiler invocation for one source.
    ///
    /// `lilypond -o <src-dir> -dpreview -dno-point-and-click <src-dir>/<name>.ly`
    pub fn command(&self, lilypond: &Path, layout: &WorkspaceLayout, name: &str) -> Command {
        let mut cmd = Command::new(lilypond);
        cmd.arg("-o")
            .arg(&layout.source_dir)
            .arg("-dpreview")
            .arg("-dno-point-and-click")
            .arg(layout.source_path(name));
        cmd
    }

    /// Compiles one source and checks that both images were produced.
    pub fn compile(&self, layout: &WorkspaceLayout, name: &str) -> LilypondResult<CompileOutcome> {
        let lilypond = self.find_lilypond()?;
        self.compile_with(&lilypond, layout, name)
    }

    fn compile_with(
        &self,
        lilypond: &Path,
        layout: &WorkspaceLayout,
        name: &str,
    ) -> LilypondResult<CompileOutcome> {
        let mut cmd = self.command(lilypond, layout, name);
        if self.config.capture_output {
            cmd.stdout(Stdio::null()).stderr(Stdio::piped());
        }

        log::info!("compiling {}", layout.source_path(name).display());
        let child = cmd.spawn().map_err(LilypondError::SpawnFailed)?;
        let (status, stderr) = match self.config.timeout {
            Some(timeout) => match wait_with_timeout(child, timeout)? {
                Some(finished) => finished,
                None => {
                    return Ok(CompileOutcome::TimedOut {
                        timeout_secs: timeout.as_secs(),
                    })
                }
            },
            None => wait_blocking(child)?,
        };

        if !status.success() {
            return Ok(CompileOutcome::Failed {
                exit_code: status.code().unwrap_or(-1),
                stderr,
            });
        }

        for path in [layout.full_page_image(name), layout.preview_image(name)] {
            if !path.is_file() {
                return Ok(CompileOutcome::MissingOutput { path });
            }
        }

        Ok(CompileOutcome::Compiled)
    }

    /// Compiles every name in order.
    ///
    /// With `fail_fast` the first unsuccessful outcome is returned as an
    /// error; otherwise failures, timeouts included, are recorded and the
    /// batch continues.
    pub fn compile_all(
        &self,
        layout: &WorkspaceLayout,
        names: &[String],
        fail_fast: bool,
    ) -> LilypondResult<CompileReport> {
        let mut report = CompileReport::default();
        if names.is_empty() {
            return Ok(report);
        }

        let lilypond = self.find_lilypond()?;
        for name in names {
            let outcome = self.compile_with(&lilypond, layout, name)?;
            if let Some(detail) = outcome.failure_detail() {
                if fail_fast {
                    return Err(match outcome {
                        CompileOutcome::TimedOut { timeout_secs } => {
                            LilypondError::Timeout { timeout_secs }
                        }
                        _ => LilypondError::compile_failed(name.as_str(), detail),
                    });
                }
                log::warn!("compilation of '{}' failed: {}", name, detail);
            }
            report.results.push((name.clone(), outcome));
        }
        Ok(report)
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

fn wait_blocking(child: Child) -> LilypondResult<(ExitStatus, String)> {
    let output = child
        .wait_with_output()
        .map_err(LilypondError::SpawnFailed)?;
    Ok((
        output.status,
        String::from_utf8_lossy(&output.stderr).into_owned(),
    ))
}

/// Waits for `child`, killing it once `timeout` has elapsed.
///
/// Returns `None` when the process was killed.
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
) -> LilypondResult<Option<(ExitStatus, String)>> {
    // Drain stderr on a side thread so a chatty compiler cannot block on a full pipe.
    let stderr_reader = child.stderr.take().map(|mut err| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            let _ = err.read_to_string(&mut buf);
            buf
        })
    });

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    log::warn!("killing LilyPond after {:?}", timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok(None);
                }
                std::thread::sleep(Duration::from_millis(100));
            }
            Err(e) => return Err(LilypondError::SpawnFailed(e)),
        }
    };

    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    Ok(Some((status, stderr)))
}
