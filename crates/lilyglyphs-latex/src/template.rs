//! Command Template Engine.
//!
//! Templates are plain LaTeX text containing a marker token. Rendering is a
//! literal replacement of every marker occurrence; no escaping is applied to
//! the substituted values, so command names must already be valid LaTeX
//! control-sequence names.

use indexmap::IndexMap;
use lilyglyphs_spec::CommandSet;

use crate::error::{LatexError, LatexResult};
use crate::signature::Signature;

/// Marker replaced by the command name.
pub const COMMAND_MARKER: &str = "CMD";

/// Template for commands that print a precompiled preview image.
pub const IMAGE_TEMPLATE: &str = r"\newcommand*{\CMDBase}[1][]{%
    \setkeys{lilyDesignOptions}{scale=1,raise=0}%
    \lilyPrintImage[#1]{CMD}%
}
\newcommand*{\CMD}[1][]{\CMDBase[#1] }
\WithSuffix\newcommand\CMD*[1][]{\CMDBase[#1]}

";

/// Continuous text exercising a command in its starred and unstarred form.
pub const TEST_PROSE_TEMPLATE: &str = r"

\noindent\textbf{\textsf{Continuous text for} \cmd{CMD}:}\\
Lorem ipsum dolor sit amet, consectetur adipisicing elit,
sed \CMD do eiusmod tempor incididunt ut labore et dolore magna aliqua \CMD*.\\
\CMD Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut aliquip
ex ea commodo consequat. Duis aute irure dolor in reprehenderit in voluptate velit esse
cillum dolore eu fugiat nulla pariatur\CMD.
\CMD Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia deserunt mollit anim id est laborum.

\bigskip
";

/// One row of the manual's reference table.
pub const REFERENCE_ROW_TEMPLATE: &str = r"\CMD & \cmd{CMD} & description\\";

/// Ordered marker/value pairs applied by [`substitute`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutions for a single command name.
    pub fn command(name: &str) -> Self {
        Self::new().with(COMMAND_MARKER, name)
    }

    pub fn with(mut self, marker: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((marker.into(), value.into()));
        self
    }
}

/// Replaces every occurrence of each marker, in insertion order.
pub fn substitute(template: &str, subs: &Substitutions) -> String {
    subs.pairs
        .iter()
        .fold(template.to_string(), |text, (marker, value)| {
            text.replace(marker.as_str(), value)
        })
}

/// Registered command templates keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, String>,
}

impl TemplateRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the templates shipped with lilyglyphs.
    pub fn builtin() -> Self {
        Self::new().register("image", IMAGE_TEMPLATE)
    }

    /// Registers (or replaces) the template for `kind`.
    pub fn register(mut self, kind: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.insert(kind.into(), text.into());
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.templates.contains_key(kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    fn template(&self, kind: &str) -> LatexResult<&str> {
        self.templates
            .get(kind)
            .map(String::as_str)
            .ok_or_else(|| LatexError::UnknownTemplateKind {
                kind: kind.to_string(),
                registered: self.kinds().collect::<Vec<_>>().join(", "),
            })
    }

    /// Renders the template registered for `kind`.
    pub fn render(&self, kind: &str, subs: &Substitutions) -> LatexResult<String> {
        Ok(substitute(self.template(kind)?, subs))
    }

    /// Checks that every command's template kind is registered.
    pub fn check_kinds(&self, commands: &CommandSet) -> LatexResult<()> {
        for spec in commands.iter() {
            self.template(&spec.template_kind)?;
        }
        Ok(())
    }
}

/// Text fragments generated for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub name: String,
    /// Metadata comment, signature and command definition.
    pub definition: Vec<String>,
    /// Continuous text using the command.
    pub test_prose: Vec<String>,
}

impl RenderedCommand {
    /// The reference-table row for this command.
    pub fn reference_row(&self) -> String {
        substitute(REFERENCE_ROW_TEMPLATE, &Substitutions::command(&self.name))
    }
}

/// Rendered commands in output order.
pub type RenderedCommands = IndexMap<String, RenderedCommand>;

/// Renders commands from a [`CommandSet`] with a fixed registry and signature.
pub struct CommandRenderer<'a> {
    registry: &'a TemplateRegistry,
    signature: &'a Signature,
}

impl<'a> CommandRenderer<'a> {
    pub fn new(registry: &'a TemplateRegistry, signature: &'a Signature) -> Self {
        Self {
            registry,
            signature,
        }
    }

    /// Renders `name` with the template registered for `kind`.
    pub fn render(
        &self,
        commands: &CommandSet,
        name: &str,
        kind: &str,
    ) -> LatexResult<RenderedCommand> {
        let template = self.registry.template(kind)?;
        let spec = commands.get(name).ok_or_else(|| LatexError::UnknownCommand {
            name: name.to_string(),
        })?;

        let subs = Substitutions::command(name);
        let definition = vec![
            format!("% {}\n", spec.summary()),
            format!("{}\n", self.signature.comment_line()),
            substitute(template, &subs),
        ];
        let test_prose = vec![substitute(TEST_PROSE_TEMPLATE, &subs)];

        Ok(RenderedCommand {
            name: name.to_string(),
            definition,
            test_prose,
        })
    }

    /// Renders every command with its own template kind, in definition order.
    pub fn render_all(&self, commands: &CommandSet) -> LatexResult<RenderedCommands> {
        let mut rendered = RenderedCommands::new();
        for spec in commands.iter() {
            let command = self.render(commands, &spec.name, &spec.template_kind)?;
            rendered.insert(spec.name.clone(), command);
        }
        log::debug!("rendered {} command(s)", rendered.len());
        Ok(rendered)
    }
}
