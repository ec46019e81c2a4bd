//! Command entries parsed from a definitions source.
//!
//! A definitions source is LilyPond-flavoured text. Each command is written as
//! an optional `%{ ... %}` comment block followed by a named music expression:
//!
//! ```text
//! %{
//!   Natural sign, for use in running text
//!   template: image
//! %}
//! accidentalNatural = {
//!   \natural
//! }
//! ```
//!
//! Comment lines become the command's descriptive tokens, except a
//! `template: <kind>` line which selects the template kind. The lines between
//! the header and the `}` that balances the header's brace are the embedded
//! score, nested music included. Anything else outside a block (version
//! statements, `%` line comments, blank lines) is ignored.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

use crate::definitions::DefinitionsRecord;
use crate::error::{SpecError, SpecResult};

/// Template kind used when an entry does not name one.
pub const DEFAULT_TEMPLATE_KIND: &str = "image";

const HEADER_PATTERN: &str = r"^\s*([^\s=]*)\s*=\s*\{\s*$";

static HEADER_REGEX: OnceLock<Regex> = OnceLock::new();

fn header_regex() -> &'static Regex {
    HEADER_REGEX.get_or_init(|| Regex::new(HEADER_PATTERN).expect("invalid regex pattern"))
}

/// A single command to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name, unique within a run.
    pub name: String,
    /// Identifier of the registered template used to render the command.
    pub template_kind: String,
    /// Free-form descriptive tokens taken from the comment block.
    pub description: Vec<String>,
    /// Lines of the embedded score, leading whitespace preserved.
    pub score: Vec<String>,
}

impl CommandSpec {
    /// Creates a command with the default template kind and no metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_kind: DEFAULT_TEMPLATE_KIND.to_string(),
            description: Vec::new(),
            score: Vec::new(),
        }
    }

    /// Sets the template kind.
    pub fn template_kind(mut self, kind: impl Into<String>) -> Self {
        self.template_kind = kind.into();
        self
    }

    /// Appends a descriptive token.
    pub fn describe(mut self, token: impl Into<String>) -> Self {
        self.description.push(token.into());
        self
    }

    /// Appends a score line.
    pub fn score_line(mut self, line: impl Into<String>) -> Self {
        self.score.push(line.into());
        self
    }

    /// The descriptive tokens joined into a single comment line.
    pub fn summary(&self) -> String {
        self.description.join(" ")
    }
}

/// Commands keyed by name, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSet {
    commands: IndexMap<String, CommandSpec>,
}

enum ParseState {
    Outside,
    Comment { start: usize },
    /// `depth` counts the braces still open, the header's included.
    Body {
        spec: CommandSpec,
        start: usize,
        depth: usize,
    },
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every command entry in a definitions record.
    pub fn parse(record: &DefinitionsRecord) -> SpecResult<Self> {
        Self::parse_with_default_kind(record, DEFAULT_TEMPLATE_KIND)
    }

    /// Parses a record, using `default_kind` for entries without a
    /// `template:` line.
    pub fn parse_with_default_kind(
        record: &DefinitionsRecord,
        default_kind: &str,
    ) -> SpecResult<Self> {
        let mut set = CommandSet::new();
        let mut state = ParseState::Outside;
        let mut description: Vec<String> = Vec::new();
        let mut kind: Option<String> = None;

        for (idx, line) in record.lines().iter().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            state = match state {
                ParseState::Outside => {
                    if let Some(rest) = trimmed.strip_prefix("%{") {
                        match rest.strip_suffix("%}") {
                            Some(inner) => {
                                take_comment_line(inner, &mut description, &mut kind);
                                ParseState::Outside
                            }
                            None => {
                                take_comment_line(rest, &mut description, &mut kind);
                                ParseState::Comment { start: line_no }
                            }
                        }
                    } else if let Some(caps) = header_regex().captures(line) {
                        let name = caps.get(1).map_or("", |m| m.as_str());
                        if name.is_empty() {
                            return Err(SpecError::EmptyCommandName { line: line_no });
                        }
                        if set.contains(name) {
                            return Err(SpecError::DuplicateCommand {
                                name: name.to_string(),
                                line: line_no,
                            });
                        }
                        let spec = CommandSpec {
                            name: name.to_string(),
                            template_kind: kind
                                .take()
                                .unwrap_or_else(|| default_kind.to_string()),
                            description: std::mem::take(&mut description),
                            score: Vec::new(),
                        };
                        ParseState::Body {
                            spec,
                            start: line_no,
                            depth: 1,
                        }
                    } else {
                        ParseState::Outside
                    }
                }
                ParseState::Comment { start } => match trimmed.strip_suffix("%}") {
                    Some(inner) => {
                        take_comment_line(inner, &mut description, &mut kind);
                        ParseState::Outside
                    }
                    None => {
                        take_comment_line(trimmed, &mut description, &mut kind);
                        ParseState::Comment { start }
                    }
                },
                ParseState::Body {
                    mut spec,
                    start,
                    depth,
                } => {
                    let (opened, closed) = count_braces(line);
                    let open = depth + opened;
                    if closed >= open {
                        if let Some(rest) = before_closing_brace(line) {
                            spec.score.push(rest);
                        }
                        log::debug!("parsed command '{}' ({} score lines)", spec.name, spec.score.len());
                        set.commands.insert(spec.name.clone(), spec);
                        ParseState::Outside
                    } else {
                        spec.score.push(line.clone());
                        ParseState::Body {
                            spec,
                            start,
                            depth: open - closed,
                        }
                    }
                }
            };
        }

        match state {
            ParseState::Outside => {}
            ParseState::Comment { start } => {
                return Err(SpecError::Unterminated {
                    what: "comment block",
                    line: start,
                })
            }
            ParseState::Body { start, .. } => {
                return Err(SpecError::Unterminated {
                    what: "command body",
                    line: start,
                })
            }
        }

        if !description.is_empty() {
            log::debug!("ignoring trailing comment block without a command");
        }

        Ok(set)
    }

    /// Adds a command, rejecting duplicate names.
    pub fn insert(&mut self, spec: CommandSpec) -> SpecResult<()> {
        if spec.name.is_empty() {
            return Err(SpecError::EmptyCommandName { line: 0 });
        }
        if self.contains(&spec.name) {
            return Err(SpecError::DuplicateCommand {
                name: spec.name,
                line: 0,
            });
        }
        self.commands.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.get(name)
    }

    /// Command names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Commands in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSpec> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Counts `{` and `}` on a score line, skipping strings and `%` comments.
fn count_braces(line: &str) -> (usize, usize) {
    let mut opened = 0;
    let mut closed = 0;
    let mut chars = line.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '%' if chars.peek() == Some(&'{') => {
                // inline block comment
                chars.next();
                let mut prev = ' ';
                for c in chars.by_ref() {
                    if prev == '%' && c == '}' {
                        break;
                    }
                    prev = c;
                }
            }
            '%' => break,
            '{' => opened += 1,
            '}' => closed += 1,
            _ => {}
        }
    }
    (opened, closed)
}

/// Score text in front of the brace that closes a body, if any.
fn before_closing_brace(line: &str) -> Option<String> {
    let head = line.rfind('}').map_or(line, |idx| &line[..idx]).trim_end();
    if head.trim().is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}

fn take_comment_line(text: &str, description: &mut Vec<String>, kind: &mut Option<String>) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    match text.strip_prefix("template:") {
        Some(k) => *kind = Some(k.trim().to_string()),
        None => description.push(text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(text: &str) -> DefinitionsRecord {
        DefinitionsRecord::from_lines(text.lines())
    }

    #[test]
    fn test_parse_entries_in_order() {
        let defs = record(
            r#"\version "2.16.0"
% a line comment that is ignored

%{
  Natural sign
  for running text
%}
accidentalNatural = {
  \natural
}

%{ template: image %}
%{ Flat sign %}
accidentalFlat = {
    \flat
}
"#,
        );

        let set = CommandSet::parse(&defs).unwrap();
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec!["accidentalNatural", "accidentalFlat"]
        );

        let natural = set.get("accidentalNatural").unwrap();
        assert_eq!(natural.description, vec!["Natural sign", "for running text"]);
        assert_eq!(natural.summary(), "Natural sign for running text");
        assert_eq!(natural.score, vec!["  \\natural"]);
        assert_eq!(natural.template_kind, "image");

        let flat = set.get("accidentalFlat").unwrap();
        assert_eq!(flat.description, vec!["Flat sign"]);
        assert_eq!(flat.score, vec!["    \\flat"]);
    }

    #[test]
    fn test_template_kind_from_comment() {
        let defs = record("%{\n template: glyph\n Clef\n%}\nclefG = {\n \\clef G\n}\n");
        let set = CommandSet::parse(&defs).unwrap();
        let clef = set.get("clefG").unwrap();
        assert_eq!(clef.template_kind, "glyph");
        assert_eq!(clef.description, vec!["Clef"]);
    }

    #[test]
    fn test_default_kind_override() {
        let defs = record("fermata = {\n \\fermata\n}\n");
        let set = CommandSet::parse_with_default_kind(&defs, "custom").unwrap();
        assert_eq!(set.get("fermata").unwrap().template_kind, "custom");
        assert!(set.get("fermata").unwrap().description.is_empty());
    }

    #[test]
    fn test_duplicate_command_rejected() {
        let defs = record("a = {\n c\n}\na = {\n d\n}\n");
        let err = CommandSet::parse(&defs).unwrap_err();
        assert!(matches!(err, SpecError::DuplicateCommand { ref name, line: 4 } if name == "a"));
    }

    #[test]
    fn test_unterminated_blocks() {
        let err = CommandSet::parse(&record("%{\n never closed\n")).unwrap_err();
        assert!(matches!(
            err,
            SpecError::Unterminated {
                what: "comment block",
                line: 1
            }
        ));

        let err = CommandSet::parse(&record("\n\nrest = {\n r4\n")).unwrap_err();
        assert!(matches!(
            err,
            SpecError::Unterminated {
                what: "command body",
                line: 3
            }
        ));
    }

    #[test]
    fn test_nested_braces_stay_in_body() {
        let defs = record(
            "clefWithText = {\n  \\relative c' {\n    c4 \\mark \"}\" % }\n  }\n}\nnext = {\n  d4\n}\n",
        );
        let set = CommandSet::parse(&defs).unwrap();

        let clef = set.get("clefWithText").unwrap();
        assert_eq!(
            clef.score,
            vec!["  \\relative c' {", "    c4 \\mark \"}\" % }", "  }"]
        );
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["clefWithText", "next"]);
    }

    #[test]
    fn test_body_closed_on_score_line() {
        let set = CommandSet::parse(&record("trill = {\n  \\trill { c4 } }\n")).unwrap();
        assert_eq!(set.get("trill").unwrap().score, vec!["  \\trill { c4 }"]);
    }

    #[test]
    fn test_count_braces_skips_strings_and_comments() {
        assert_eq!(count_braces("  \\relative c' {"), (1, 0));
        assert_eq!(count_braces("c4^\"{\" }"), (0, 1));
        assert_eq!(count_braces("c4 %{ } %} { % }"), (1, 0));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = CommandSet::parse(&record("= {\n}\n")).unwrap_err();
        assert!(matches!(err, SpecError::EmptyCommandName { line: 1 }));
    }

    #[test]
    fn test_empty_record() {
        let set = CommandSet::parse(&DefinitionsRecord::default()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_builder() {
        let mut set = CommandSet::new();
        set.insert(CommandSpec::new("segno").describe("Segno").score_line("\\segno"))
            .unwrap();
        assert!(set.insert(CommandSpec::new("segno")).is_err());
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().summary(), "Segno");
    }
}
