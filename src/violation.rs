//! Violation records reported by checks
//!
//! A [`Violation`] is the unit of currency between checks, listeners, and
//! report formatters. Checks produce them, the notifier routes them by code,
//! and formatters turn them into output lines. Beyond the fields below no
//! component makes assumptions about what a violation "means".

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One issue found in analyzed source code.
///
/// Line and column numbers are 1-based. The filename is attached by whoever
/// drives the checks; checks themselves usually only know the input slice
/// they were handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Short code identifying the rule, e.g. `L001`.
    pub code: String,

    /// Human-readable description of the issue.
    pub message: String,

    /// Line the issue was found on (1-based).
    pub line: usize,

    /// Column the issue starts at (1-based).
    pub column: usize,

    /// Source file the issue belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
}

impl Violation {
    /// Creates a violation without a filename
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            line,
            column,
            filename: None,
        }
    }

    /// Attaches the source filename
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_filename() {
        let violation = Violation::new("L001", "line too long", 3, 80);

        assert_eq!(violation.code, "L001");
        assert_eq!(violation.line, 3);
        assert!(violation.filename.is_none());
    }

    #[test]
    fn with_filename_attaches_path() {
        let violation = Violation::new("L002", "trailing whitespace", 1, 10)
            .with_filename("src/main.rs");

        assert_eq!(
            violation.filename.as_deref(),
            Some(std::path::Path::new("src/main.rs"))
        );
    }

    #[test]
    fn serializes_without_null_filename() {
        let violation = Violation::new("L001", "line too long", 3, 80);
        let json = serde_json::to_string(&violation).unwrap();

        assert!(!json.contains("filename"));
    }
}
