//! Source positions attached to AST nodes and surfaced on error.
//!
//! Grounded on `original_source/slang/syntax/__init__.py`'s `Position`
//! class, trimmed to the two fields a hand-rolled recursive-descent lexer
//! can cheaply track (no PEG-generator `rule`/`pos`/`endpos` concept here).

use std::fmt;

/// A line/column location in a source file, 1-indexed to match editor
/// conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Used for synthesized nodes that have no source location of their own
    /// (e.g. the `Reference` inserted by self-application at `Call` time).
    #[must_use]
    pub fn synthetic() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
