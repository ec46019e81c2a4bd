//! Workspace Locator and directory layout.
//!
//! All paths used by the pipeline hang off the package root, which is found by
//! searching the current directory's ancestry for a segment named after the
//! package.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{SpecError, SpecResult};

/// Directory segment that marks the workspace root.
pub const PACKAGE_NAME: &str = "lilyglyphs";

/// Definitions sources.
pub const DEFINITIONS_DIR: &str = "definitions";
/// Generated LilyPond sources and raw compiler output.
pub const SOURCE_DIR: &str = "generated_src";
/// Final preview images.
pub const IMAGE_DIR: &str = "pdfs";
/// Generated documents awaiting manual review.
pub const STASH_DIR: &str = "stash_new_commands";

/// Extension of compiler sources.
pub const SOURCE_EXT: &str = "ly";
/// Extension of full-page and preview images.
pub const IMAGE_EXT: &str = "pdf";
/// Infix the compiler puts before the image extension of the preview variant.
pub const PREVIEW_SUFFIX: &str = "preview";

/// Finds the first ancestor of `cwd` whose last segment is `package`.
///
/// The search runs from the filesystem root downwards, so the outermost match
/// wins when the name appears more than once.
pub fn locate_root(cwd: &Path, package: &str) -> SpecResult<PathBuf> {
    let mut root = PathBuf::new();
    for component in cwd.components() {
        root.push(component.as_os_str());
        if let Component::Normal(segment) = component {
            if segment == OsStr::new(package) {
                return Ok(root);
            }
        }
    }

    Err(SpecError::NotInWorkspace {
        cwd: cwd.to_path_buf(),
        package: package.to_string(),
    })
}

/// Immutable description of the workspace directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub root: PathBuf,
    pub definitions_dir: PathBuf,
    pub source_dir: PathBuf,
    pub image_dir: PathBuf,
    pub stash_dir: PathBuf,
}

impl WorkspaceLayout {
    /// Derives the layout from a known root directory.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            definitions_dir: root.join(DEFINITIONS_DIR),
            source_dir: root.join(SOURCE_DIR),
            image_dir: root.join(IMAGE_DIR),
            stash_dir: root.join(STASH_DIR),
            root,
        }
    }

    /// Locates the workspace containing `cwd`.
    pub fn locate(cwd: &Path) -> SpecResult<Self> {
        locate_root(cwd, PACKAGE_NAME).map(Self::from_root)
    }

    /// `generated_src/<name>.ly`
    pub fn source_path(&self, name: &str) -> PathBuf {
        self.source_dir.join(format!("{}.{}", name, SOURCE_EXT))
    }

    /// `generated_src/<name>.pdf`
    pub fn full_page_image(&self, name: &str) -> PathBuf {
        self.source_dir.join(format!("{}.{}", name, IMAGE_EXT))
    }

    /// `generated_src/<name>.preview.pdf`
    pub fn preview_image(&self, name: &str) -> PathBuf {
        self.source_dir
            .join(format!("{}.{}.{}", name, PREVIEW_SUFFIX, IMAGE_EXT))
    }

    /// `pdfs/<name>.pdf`
    pub fn final_image(&self, name: &str) -> PathBuf {
        self.image_dir.join(format!("{}.{}", name, IMAGE_EXT))
    }

    /// `stash_new_commands/<file_name>`
    pub fn stash_path(&self, file_name: &str) -> PathBuf {
        self.stash_dir.join(file_name)
    }

    /// Resolves a definitions argument.
    ///
    /// Absolute paths are used as given. Relative paths are tried against the
    /// invocation directory first and then against `definitions/`. When neither
    /// exists the invocation-relative path is returned so the reader can report
    /// it.
    pub fn resolve_definitions(&self, arg: &Path, invocation_dir: &Path) -> PathBuf {
        if arg.is_absolute() {
            return arg.to_path_buf();
        }
        let local = invocation_dir.join(arg);
        if local.exists() {
            return local;
        }
        let in_defs = self.definitions_dir.join(arg);
        if in_defs.exists() {
            return in_defs;
        }
        local
    }

    /// Creates the generated-source, image and stash directories if missing.
    pub fn create_output_dirs(&self) -> io::Result<()> {
        for dir in [&self.source_dir, &self.image_dir, &self.stash_dir] {
            if !dir.is_dir() {
                log::info!("creating {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }

    /// The fixed directories paired with a short label, for reporting.
    pub fn directories(&self) -> [(&'static str, &Path); 4] {
        [
            (DEFINITIONS_DIR, self.definitions_dir.as_path()),
            (SOURCE_DIR, self.source_dir.as_path()),
            (IMAGE_DIR, self.image_dir.as_path()),
            (STASH_DIR, self.stash_dir.as_path()),
        ]
    }
}
