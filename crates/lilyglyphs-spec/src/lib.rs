//! lilyglyphs definitions library
//!
//! This crate holds the data model shared by the lilyglyphs build helper:
//!
//! - **Definitions source**: a line-oriented file read into a
//!   [`DefinitionsRecord`] with trailing spaces stripped.
//! - **Command set**: the ordered map of command names to their template kind,
//!   descriptive tokens and embedded LilyPond score ([`CommandSet`]).
//! - **Workspace layout**: the package root located from the current
//!   directory plus the fixed subdirectories every step works in
//!   ([`WorkspaceLayout`]).
//!
//! # Example
//!
//! ```
//! use lilyglyphs_spec::{CommandSet, DefinitionsRecord};
//!
//! let record = DefinitionsRecord::from_lines([
//!     "%{",
//!     "  Natural sign",
//!     "%}",
//!     "accidentalNatural = {",
//!     "  \\natural",
//!     "}",
//! ]);
//! let commands = CommandSet::parse(&record).unwrap();
//! assert_eq!(commands.names().collect::<Vec<_>>(), vec!["accidentalNatural"]);
//! ```
//!
//! # Modules
//!
//! - [`error`]: Error type and the shared [`BackendError`] trait
//! - [`definitions`]: Definitions Reader
//! - [`command`]: Command entries and their parser
//! - [`layout`]: Workspace Locator and directory layout

pub mod command;
pub mod definitions;
pub mod error;
pub mod layout;

pub use command::{CommandSet, CommandSpec, DEFAULT_TEMPLATE_KIND};
pub use definitions::DefinitionsRecord;
pub use error::{BackendError, SpecError, SpecResult};
pub use layout::{
    locate_root, WorkspaceLayout, DEFINITIONS_DIR, IMAGE_DIR, IMAGE_EXT, PACKAGE_NAME,
    PREVIEW_SUFFIX, SOURCE_DIR, SOURCE_EXT, STASH_DIR,
};
