//! Pretty-print whitespace policy
//!
//! The encoder asks for "a line break at this depth" and never looks at the
//! characters; [`Indenter`] decides what that means.

use std::iter;

use crate::config::IndentConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Indenter {
    config: IndentConfig,
}

impl Default for Indenter {
    fn default() -> Self {
        Self::new(IndentConfig::default())
    }
}

impl Indenter {
    pub const fn new(config: IndentConfig) -> Self {
        Self { config }
    }

    /// Writes nothing at all
    pub fn compact() -> Self {
        Self::new(IndentConfig::compact())
    }

    pub fn config(&self) -> &IndentConfig {
        &self.config
    }

    /// Number of spaces written for `level`
    pub fn width(&self, level: usize) -> usize {
        level.saturating_mul(self.config.indent_spaces)
    }

    /// Appends the newline string followed by the indentation for `level`
    pub fn write_indentation(&self, out: &mut String, level: usize) {
        out.push_str(&self.config.newline);
        out.extend(iter::repeat(' ').take(self.width(level)));
    }

    /// Appends whatever ends a document
    pub fn finish(&self, out: &mut String) {
        if self.config.trailing_newline {
            out.push_str(&self.config.newline);
        }
    }
}
