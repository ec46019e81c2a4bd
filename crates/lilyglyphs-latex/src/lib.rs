//! lilyglyphs LaTeX generation
//!
//! Renders LaTeX command definitions, reference-table rows and test prose
//! for each command of a definitions source, and assembles them into the
//! stash document.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lilyglyphs_latex::{assemble, CommandRenderer, Signature, TemplateRegistry};
//! use lilyglyphs_spec::{CommandSet, CommandSpec};
//!
//! let mut commands = CommandSet::new();
//! commands.insert(CommandSpec::new("fermata").describe("Fermata")).unwrap();
//!
//! let registry = TemplateRegistry::builtin();
//! let signature = Signature::new("lilyglyphs", NaiveDate::from_ymd_opt(2013, 2, 5).unwrap());
//! let rendered = CommandRenderer::new(&registry, &signature)
//!     .render_all(&commands)
//!     .unwrap();
//!
//! let document = assemble(&rendered, &signature);
//! assert!(document.contains("\\fermata & \\cmd{fermata} & description"));
//! ```

pub mod boilerplate;
pub mod document;
pub mod error;
pub mod signature;
pub mod template;

pub use document::{assemble, write_document};
pub use error::{LatexError, LatexResult};
pub use signature::Signature;
pub use template::{
    substitute, CommandRenderer, RenderedCommand, RenderedCommands, Substitutions,
    TemplateRegistry, COMMAND_MARKER,
};
