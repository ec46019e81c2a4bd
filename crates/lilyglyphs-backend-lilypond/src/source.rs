//! LilyPond score sources for command entries.
//!
//! Each command's embedded score is wrapped in a fixed single-staff file
//! without staff lines, clef, time signature or tagline, so that the preview
//! image is cropped to the glyph itself.

use std::fs;

use lilyglyphs_spec::{CommandSet, CommandSpec, WorkspaceLayout};

use crate::error::{LilypondError, LilypondResult};

/// LilyPond language version written into generated sources.
pub const LILYPOND_VERSION: &str = "2.16.0";

const SOURCE_PREFIX: &str = r#"#(set-global-staff-size 14)

\paper {
  indent = 0
}

\header {
  tagline = ""
}

\score {
  \new Staff \with {
    \remove "Staff_symbol_engraver"
    \remove "Clef_engraver"
    \remove "Time_signature_engraver"
  }
  {
"#;

const SOURCE_SUFFIX: &str = "  }\n}\n";

/// Renders the complete source file for one command.
pub fn render_score_source(spec: &CommandSpec) -> String {
    let mut out = format!("\\version \"{}\"\n\n", LILYPOND_VERSION);
    if !spec.description.is_empty() {
        out.push_str(&format!("% {}\n\n", spec.summary()));
    }
    out.push_str(SOURCE_PREFIX);
    for line in &spec.score {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(SOURCE_SUFFIX);
    out
}

/// Writes `generated_src/<name>.ly` for every command.
///
/// Files whose content is already current are left untouched. Returns the
/// names of the files that were (re)written.
pub fn write_score_sources(
    layout: &WorkspaceLayout,
    commands: &CommandSet,
) -> LilypondResult<Vec<String>> {
    let mut written = Vec::new();
    for spec in commands.iter() {
        let path = layout.source_path(&spec.name);
        let content = render_score_source(spec);

        if fs::read_to_string(&path).ok().as_deref() == Some(content.as_str()) {
            continue;
        }

        fs::write(&path, &content).map_err(|source| LilypondError::WriteSourceFailed {
            path: path.clone(),
            source,
        })?;
        log::debug!("wrote {}", path.display());
        written.push(spec.name.clone());
    }
    Ok(written)
}
