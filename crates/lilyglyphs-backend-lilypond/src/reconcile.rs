//! Artifact Reconciler.
//!
//! Finds generated sources that have no produced image yet. Presence of an
//! image with the same base name is all that counts; timestamps are not
//! compared.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use lilyglyphs_spec::{WorkspaceLayout, IMAGE_EXT, SOURCE_EXT};

use crate::error::{LilypondError, LilypondResult};

/// Lists the base names of files in `dir` whose extension is `ext`.
///
/// Names come back in directory-listing order, which is platform dependent.
pub fn base_names_with_ext(dir: &Path, ext: &str) -> LilypondResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| LilypondError::ListDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LilypondError::ListDirFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(ext) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    Ok(names)
}

/// Returns every source base name that has no image in the image directory.
pub fn pending_sources(layout: &WorkspaceLayout) -> LilypondResult<Vec<String>> {
    let images: HashSet<String> = base_names_with_ext(&layout.image_dir, IMAGE_EXT)?
        .into_iter()
        .collect();

    let pending: Vec<String> = base_names_with_ext(&layout.source_dir, SOURCE_EXT)?
        .into_iter()
        .filter(|name| !images.contains(name))
        .collect();

    log::debug!(
        "{} image(s) present, {} source(s) pending",
        images.len(),
        pending.len()
    );
    Ok(pending)
}
