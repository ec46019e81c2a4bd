//! Post-compilation cleanup.
//!
//! Pass 1 removes compiler byproducts from the generated-source directory.
//! Pass 2 replaces each compiled source's full-page image with its preview
//! variant, moved into the image directory under the plain base name.

use std::fs;
use std::path::PathBuf;

use lilyglyphs_spec::{WorkspaceLayout, IMAGE_EXT, SOURCE_EXT};
use serde::Serialize;

use crate::error::{LilypondError, LilypondResult};

/// Files touched by a cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupSummary {
    /// Byproducts deleted in pass 1.
    pub removed: Vec<PathBuf>,
    /// Final images installed in pass 2.
    pub installed: Vec<PathBuf>,
}

/// Deletes every file in the generated-source directory whose extension is
/// neither the source nor the image extension.
pub fn remove_intermediates(layout: &WorkspaceLayout) -> LilypondResult<Vec<PathBuf>> {
    let dir = &layout.source_dir;
    let entries = fs::read_dir(dir).map_err(|source| LilypondError::ListDirFailed {
        path: dir.clone(),
        source,
    })?;

    let mut removed = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| LilypondError::ListDirFailed {
                path: dir.clone(),
                source,
            })?
            .path();
        if path.is_dir() {
            continue;
        }
        let keep = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some(ext) if ext == SOURCE_EXT || ext == IMAGE_EXT
        );
        if keep {
            continue;
        }
        fs::remove_file(&path).map_err(|source| LilypondError::RemoveFailed {
            path: path.clone(),
            source,
        })?;
        log::debug!("removed {}", path.display());
        removed.push(path);
    }
    Ok(removed)
}

/// Removes the full-page image of each name and moves its preview image to
/// `pdfs/<name>.pdf`.
///
/// Fails on the first name whose full-page or preview image is absent.
pub fn install_previews(
    layout: &WorkspaceLayout,
    names: &[String],
) -> LilypondResult<Vec<PathBuf>> {
    let mut installed = Vec::with_capacity(names.len());
    for name in names {
        let full_page = layout.full_page_image(name);
        let preview = layout.preview_image(name);
        let target = layout.final_image(name);

        if !full_page.is_file() {
            return Err(LilypondError::MissingOutput { path: full_page });
        }
        if !preview.is_file() {
            return Err(LilypondError::MissingOutput { path: preview });
        }

        fs::remove_file(&full_page).map_err(|source| LilypondError::RemoveFailed {
            path: full_page.clone(),
            source,
        })?;
        fs::rename(&preview, &target).map_err(|source| LilypondError::RenameFailed {
            from: preview.clone(),
            to: target.clone(),
            source,
        })?;
        log::debug!("installed {}", target.display());
        installed.push(target);
    }
    Ok(installed)
}

/// Runs both cleanup passes for the given compiled names.
pub fn cleanup(layout: &WorkspaceLayout, compiled: &[String]) -> LilypondResult<CleanupSummary> {
    let removed = remove_intermediates(layout)?;
    let installed = install_previews(layout, compiled)?;
    Ok(CleanupSummary { removed, installed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn workspace() -> (tempfile::TempDir, WorkspaceLayout) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::from_root(tmp.path());
        layout.create_output_dirs().unwrap();
        (tmp, layout)
    }

    fn touch(path: &Path) {
        fs::write(path, path.display().to_string()).unwrap();
    }

    fn listing(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn compiled_artifacts(layout: &WorkspaceLayout, name: &str) {
        touch(&layout.source_path(name));
        touch(&layout.full_page_image(name));
        touch(&layout.preview_image(name));
        touch(&layout.source_dir.join(format!("{}.log", name)));
        touch(&layout.source_dir.join(format!("{}.preview.eps", name)));
        touch(&layout.source_dir.join(format!("{}-systems.tex", name)));
    }

    #[test]
    fn test_cleanup_leaves_sources_and_final_images() {
        let (_tmp, layout) = workspace();
        compiled_artifacts(&layout, "natural");
        compiled_artifacts(&layout, "flat");
        touch(&layout.source_dir.join("README"));

        let names = vec!["natural".to_string(), "flat".to_string()];
        let summary = cleanup(&layout, &names).unwrap();

        assert_eq!(summary.removed.len(), 7);
        assert_eq!(summary.installed.len(), 2);
        assert_eq!(listing(&layout.source_dir), vec!["flat.ly", "natural.ly"]);
        assert_eq!(listing(&layout.image_dir), vec!["flat.pdf", "natural.pdf"]);

        // The installed file is the preview variant, not the full page.
        let content = fs::read_to_string(layout.final_image("natural")).unwrap();
        assert!(content.ends_with("natural.preview.pdf"));
    }

    #[test]
    fn test_cleanup_ignores_uncompiled_names() {
        let (_tmp, layout) = workspace();
        compiled_artifacts(&layout, "natural");
        touch(&layout.source_path("broken"));

        cleanup(&layout, &["natural".to_string()]).unwrap();
        assert_eq!(listing(&layout.source_dir), vec!["broken.ly", "natural.ly"]);
        assert_eq!(listing(&layout.image_dir), vec!["natural.pdf"]);
    }

    #[test]
    fn test_missing_preview_is_an_error() {
        let (_tmp, layout) = workspace();
        touch(&layout.source_path("natural"));
        touch(&layout.full_page_image("natural"));

        let err = install_previews(&layout, &["natural".to_string()]).unwrap_err();
        match err {
            LilypondError::MissingOutput { path } => {
                assert_eq!(path, layout.preview_image("natural"))
            }
            other => panic!("unexpected error: {other}"),
        }
        // The full-page image is only removed once both files are known to exist.
        assert!(layout.full_page_image("natural").is_file());
    }

    #[test]
    fn test_missing_full_page_is_an_error() {
        let (_tmp, layout) = workspace();
        touch(&layout.preview_image("natural"));

        let err = install_previews(&layout, &["natural".to_string()]).unwrap_err();
        assert!(matches!(err, LilypondError::MissingOutput { .. }));
    }
}
