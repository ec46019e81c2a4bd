//! lilyglyphs End-to-End Test Infrastructure
//!
//! This crate drives the full build pipeline (definitions, sources,
//! compilation, cleanup, document) against throwaway workspaces.
//!
//! ## Running Tests
//!
//! ```bash
//! # Runs against a scripted stand-in compiler, no LilyPond required
//! cargo test -p lilyglyphs-tests
//!
//! # Also compile with a real LilyPond installation
//! LILYGLYPHS_RUN_LILYPOND_TESTS=1 cargo test -p lilyglyphs-tests -- --ignored
//! ```

pub mod harness;

pub use harness::{
    is_lilypond_available, should_run_lilypond_tests, TestWorkspace, FAILING_NAME_MARKER,
    HANGING_NAME_MARKER, MISSING_PREVIEW_MARKER,
};
