//! Entering the lilyglyphs workspace.

use anyhow::{Context, Result};
use lilyglyphs_spec::{WorkspaceLayout, PACKAGE_NAME};
use std::env;
use std::path::{Path, PathBuf};

/// The located workspace plus the directory the tool was started from.
#[derive(Debug, Clone)]
pub struct Session {
    pub layout: WorkspaceLayout,
    pub invocation_dir: PathBuf,
}

impl Session {
    /// Locates the workspace from the current directory and changes into its root.
    ///
    /// Every later relative path is relative to the root.
    pub fn enter() -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read current directory")?;
        let session = Self::locate(&cwd)?;
        env::set_current_dir(&session.layout.root).with_context(|| {
            format!(
                "Failed to change into workspace root: {}",
                session.layout.root.display()
            )
        })?;
        log::info!("workspace root: {}", session.layout.root.display());
        Ok(session)
    }

    /// Locates the workspace containing `cwd` without touching process state.
    pub fn locate(cwd: &Path) -> Result<Self> {
        let layout = WorkspaceLayout::locate(cwd)?;
        Ok(Self {
            layout,
            invocation_dir: cwd.to_path_buf(),
        })
    }
}

/// Name of the running executable, used in generated signatures.
pub fn script_name() -> String {
    env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| PACKAGE_NAME.to_string())
}
