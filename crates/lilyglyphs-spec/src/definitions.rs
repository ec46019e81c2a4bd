//! Definitions Reader.
//!
//! Loads the definitions source into an ordered, immutable list of lines.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SpecError, SpecResult};

/// The raw lines of a definitions source, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionsRecord {
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl DefinitionsRecord {
    /// Reads a definitions file.
    ///
    /// Each line keeps its leading whitespace and interior content; only
    /// trailing spaces and the newline are stripped. An empty file yields an
    /// empty record.
    pub fn read(path: &Path) -> SpecResult<Self> {
        if !path.exists() {
            return Err(SpecError::DefinitionsNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| SpecError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        let lines: Vec<String> = content.split_inclusive('\n').map(strip_line).collect();
        log::debug!("read {} line(s) from {}", lines.len(), path.display());

        Ok(Self {
            path: Some(path.to_path_buf()),
            lines,
        })
    }

    /// Builds a record from in-memory lines, applying the same stripping.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            path: None,
            lines: lines.into_iter().map(|l| strip_line(l.as_ref())).collect(),
        }
    }

    /// The file this record was read from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All lines in original order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn strip_line(line: &str) -> String {
    line.trim_end_matches([' ', '\n']).to_string()
}
