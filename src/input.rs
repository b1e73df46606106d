//! Analysis inputs handed to checks
//!
//! The execution engine prepares three shapes of input from a source file:
//! the parsed syntax tree, logical lines (continuations joined), and raw
//! physical lines. Every check declares which shape it consumes via
//! [`InputKind`], and the plugin layer routes inputs accordingly.

use serde::{Deserialize, Serialize};

/// The input shape a check declares it consumes.
///
/// Declared at registration time on the entry point. Checks tagged
/// [`InputKind::Other`] are never routed any of the three standard shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// The full syntax tree of a source file
    Tree,

    /// One logical line, with physical continuations joined
    LogicalLine,

    /// One raw physical line
    PhysicalLine,

    /// Anything else; invisible to input routing
    Other,
}

impl InputKind {
    pub fn as_str(&self) -> &str {
        match self {
            InputKind::Tree => "tree",
            InputKind::LogicalLine => "logical_line",
            InputKind::PhysicalLine => "physical_line",
            InputKind::Other => "other",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parsed representation of a source file.
///
/// Produced by the external parsing engine. The plugin layer treats it as an
/// opaque handle; tree checks decide what to do with it.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    /// The source text the tree was parsed from
    pub source: String,
}

impl SyntaxTree {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// One logical line: physical continuations joined into a single statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// The joined text
    pub text: String,

    /// Physical line number the logical line starts on (1-based)
    pub line: usize,
}

impl LogicalLine {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// One raw physical line, terminator included when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalLine {
    /// The line text
    pub text: String,

    /// Line number (1-based)
    pub line: usize,
}

impl PhysicalLine {
    pub fn new(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }
}

/// The input actually handed to a check's `run`.
#[derive(Debug)]
pub enum CheckInput<'a> {
    Tree(&'a SyntaxTree),
    Logical(&'a LogicalLine),
    Physical(&'a PhysicalLine),
}
