//! Document Assembler.
//!
//! Concatenates the rendered commands with the fixed banners into the stash
//! document that is reviewed and copied from by hand.

use std::fs;
use std::path::PathBuf;

use lilyglyphs_spec::WorkspaceLayout;

use crate::boilerplate::{
    BEGIN_DOCUMENT, END_DOCUMENT, LICENSE_BANNER, REFTABLE_BANNER, SCRIPT_NAME_MARKER,
    START_BANNER, TESTCODE_BANNER, TITLE_LINE,
};
use crate::error::{LatexError, LatexResult};
use crate::signature::Signature;
use crate::template::{substitute, RenderedCommands, Substitutions};

/// Builds the full document text.
///
/// Definitions, table rows and test prose all follow the iteration order of
/// `rendered`. Apart from the date in `signature`, identical input yields
/// identical output.
pub fn assemble(rendered: &RenderedCommands, signature: &Signature) -> String {
    let mut out = String::new();

    out.push_str(LICENSE_BANNER);
    out.push_str(TITLE_LINE);
    out.push_str(&signature.comment_line());
    out.push('\n');
    out.push_str(&substitute(
        START_BANNER,
        &Substitutions::new().with(SCRIPT_NAME_MARKER, signature.script.as_str()),
    ));

    for command in rendered.values() {
        for fragment in &command.definition {
            out.push_str(fragment);
        }
    }

    out.push_str(BEGIN_DOCUMENT);
    out.push_str(&signature.author_line());
    out.push('\n');

    out.push_str(REFTABLE_BANNER);
    for command in rendered.values() {
        out.push_str(&command.reference_row());
        out.push('\n');
    }

    out.push_str(TESTCODE_BANNER);
    for command in rendered.values() {
        for fragment in &command.test_prose {
            out.push_str(fragment);
        }
    }

    out.push_str(END_DOCUMENT);
    out
}

/// Writes `text` to `stash_new_commands/<file_name>`.
///
/// An existing file of that name is overwritten; the overwrite is logged.
pub fn write_document(
    layout: &WorkspaceLayout,
    file_name: &str,
    text: &str,
) -> LatexResult<PathBuf> {
    let path = layout.stash_path(file_name);
    if path.exists() {
        log::warn!("overwriting {}", path.display());
    }
    fs::write(&path, text).map_err(|source| LatexError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
