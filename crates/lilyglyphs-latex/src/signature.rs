//! Signature lines identifying the generating script and date.

use chrono::NaiveDate;

/// Who generated a file, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub script: String,
    pub date: NaiveDate,
}

impl Signature {
    pub fn new(script: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            script: script.into(),
            date,
        }
    }

    /// Signature dated with the local calendar day.
    pub fn today(script: impl Into<String>) -> Self {
        Self::new(script, chrono::Local::now().date_naive())
    }

    /// `created by <script> on <YYYY-MM-DD>`
    pub fn author_line(&self) -> String {
        format!("created by {} on {}", self.script, self.date.format("%Y-%m-%d"))
    }

    /// The author line as a LaTeX comment.
    pub fn comment_line(&self) -> String {
        format!("% {}", self.author_line())
    }
}
