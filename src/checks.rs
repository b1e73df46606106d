//! Built-in checks
//!
//! A small set of style checks that ship with Lintel. They register through
//! the same [`StaticRegistry`] as third-party checks and exercise the whole
//! plugin surface: option registration, both option-provisioning hook
//! shapes, and input-kind classification.
//!
//! Loaded extensions are shared immutably, so checks that consume options
//! keep their parsed state in atomics.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::input::{CheckInput, InputKind};
use crate::options::{OptionRegistry, OptionSpec, Options, OptionsError};
use crate::plugin::{Check, Checkers, Extension, StaticEntryPoint, StaticRegistry};
use crate::violation::Violation;

/// Default maximum physical line length
pub const DEFAULT_MAX_LINE_LENGTH: usize = 79;

fn strip_terminator(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// `L001`: physical lines longer than the configured maximum
pub struct LineLength {
    max: AtomicUsize,
}

impl LineLength {
    pub fn new() -> Self {
        Self {
            max: AtomicUsize::new(DEFAULT_MAX_LINE_LENGTH),
        }
    }
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension for LineLength {
    fn name(&self) -> &str {
        "line-length"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn add_options(&self, registry: &mut OptionRegistry) {
        registry.add_option(
            OptionSpec::new("max-line-length")
                .with_help("Maximum allowed physical line length")
                .with_default(DEFAULT_MAX_LINE_LENGTH.to_string()),
        );
    }

    fn parse_options(
        &self,
        _registry: &OptionRegistry,
        options: &Options,
        _extra_args: &[String],
    ) -> Result<(), OptionsError> {
        if let Some(max) = options.get_usize("max-line-length") {
            self.max.store(max, Ordering::Relaxed);
        }
        Ok(())
    }

    fn as_check(&self) -> Option<&dyn Check> {
        Some(self)
    }
}

impl Check for LineLength {
    fn run(&self, input: &CheckInput<'_>) -> anyhow::Result<Vec<Violation>> {
        let CheckInput::Physical(line) = input else {
            return Ok(Vec::new());
        };
        let max = self.max.load(Ordering::Relaxed);
        let width = strip_terminator(&line.text).chars().count();
        if width > max {
            return Ok(vec![Violation::new(
                "L001",
                format!("line too long ({width} > {max} characters)"),
                line.line,
                max + 1,
            )]);
        }
        Ok(Vec::new())
    }
}

/// `L002`: trailing whitespace on a physical line
pub struct TrailingWhitespace;

impl Extension for TrailingWhitespace {
    fn name(&self) -> &str {
        "trailing-whitespace"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn as_check(&self) -> Option<&dyn Check> {
        Some(self)
    }
}

impl Check for TrailingWhitespace {
    fn run(&self, input: &CheckInput<'_>) -> anyhow::Result<Vec<Violation>> {
        let CheckInput::Physical(line) = input else {
            return Ok(Vec::new());
        };
        let text = strip_terminator(&line.text);
        let stripped = text.trim_end();
        if stripped.len() < text.len() {
            return Ok(vec![Violation::new(
                "L002",
                "trailing whitespace",
                line.line,
                stripped.chars().count() + 1,
            )]);
        }
        Ok(Vec::new())
    }
}

/// `L011`: multiple statements on one logical line
///
/// Uses the reduced option-provisioning hook: it only ever needs the parsed
/// options value.
pub struct CompoundStatement {
    allow: AtomicBool,
}

impl CompoundStatement {
    pub fn new() -> Self {
        Self {
            allow: AtomicBool::new(false),
        }
    }
}

impl Default for CompoundStatement {
    fn default() -> Self {
        Self::new()
    }
}

impl Extension for CompoundStatement {
    fn name(&self) -> &str {
        "compound-statement"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn add_options(&self, registry: &mut OptionRegistry) {
        registry.add_option(
            OptionSpec::new("allow-compound-statements")
                .with_help("Do not report multiple statements on one logical line"),
        );
    }

    fn parse_options_simple(&self, options: &Options) {
        if let Some(allow) = options.get_bool("allow-compound-statements") {
            self.allow.store(allow, Ordering::Relaxed);
        }
    }

    fn as_check(&self) -> Option<&dyn Check> {
        Some(self)
    }
}

impl Check for CompoundStatement {
    fn run(&self, input: &CheckInput<'_>) -> anyhow::Result<Vec<Violation>> {
        let CheckInput::Logical(line) = input else {
            return Ok(Vec::new());
        };
        if self.allow.load(Ordering::Relaxed) {
            return Ok(Vec::new());
        }

        let mut violations = Vec::new();
        let trimmed = line.text.trim_end();
        for (index, _) in trimmed.char_indices().filter(|(_, c)| *c == ';') {
            // A line-final semicolon is a statement terminator, not a separator.
            if index + 1 == trimmed.len() {
                continue;
            }
            violations.push(Violation::new(
                "L011",
                "multiple statements on one line (semicolon)",
                line.line,
                trimmed[..index].chars().count() + 1,
            ));
        }
        Ok(violations)
    }
}

/// Registers the bundled checks on `registry`
pub fn register_builtins(registry: &mut StaticRegistry) {
    registry.register(
        Checkers::NAMESPACE,
        "line-length",
        StaticEntryPoint::new(|| Arc::new(LineLength::new())).with_input(InputKind::PhysicalLine),
    );
    registry.register(
        Checkers::NAMESPACE,
        "trailing-whitespace",
        StaticEntryPoint::new(|| Arc::new(TrailingWhitespace)).with_input(InputKind::PhysicalLine),
    );
    registry.register(
        Checkers::NAMESPACE,
        "compound-statement",
        StaticEntryPoint::new(|| Arc::new(CompoundStatement::new()))
            .with_input(InputKind::LogicalLine),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{LogicalLine, PhysicalLine};

    fn physical(text: &str) -> PhysicalLine {
        PhysicalLine::new(text, 1)
    }

    #[test]
    fn line_length_respects_default() {
        let check = LineLength::new();

        let short = physical("fn main() {}\n");
        assert!(check.run(&CheckInput::Physical(&short)).unwrap().is_empty());

        let long = physical(&format!("{}\n", "x".repeat(90)));
        let violations = check.run(&CheckInput::Physical(&long)).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "L001");
        assert_eq!(violations[0].column, DEFAULT_MAX_LINE_LENGTH + 1);
    }

    #[test]
    fn line_length_takes_configured_maximum() {
        let check = LineLength::new();
        let mut options = Options::new();
        options.set("max-line-length", 100);
        check
            .parse_options(&OptionRegistry::new(), &options, &[])
            .unwrap();

        let line = physical(&"x".repeat(90));
        assert!(check.run(&CheckInput::Physical(&line)).unwrap().is_empty());
    }

    #[test]
    fn line_length_counts_chars_not_bytes() {
        let check = LineLength::new();
        // 60 two-byte characters stay under the 79-character limit.
        let line = physical(&"é".repeat(60));
        assert!(check.run(&CheckInput::Physical(&line)).unwrap().is_empty());
    }

    #[test]
    fn trailing_whitespace_points_past_content() {
        let check = TrailingWhitespace;
        let line = physical("let x = 1;   \n");

        let violations = check.run(&CheckInput::Physical(&line)).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, "L002");
        assert_eq!(violations[0].column, 11);
    }

    #[test]
    fn trailing_whitespace_ignores_clean_lines() {
        let check = TrailingWhitespace;
        let line = physical("let x = 1;\n");
        assert!(check.run(&CheckInput::Physical(&line)).unwrap().is_empty());
    }

    #[test]
    fn compound_statement_reports_separators_only() {
        let check = CompoundStatement::new();
        let line = LogicalLine::new("let x = 1; let y = 2;", 4);

        let violations = check.run(&CheckInput::Logical(&line)).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 4);
        assert_eq!(violations[0].column, 10);
    }

    #[test]
    fn compound_statement_can_be_disabled() {
        let check = CompoundStatement::new();
        let mut options = Options::new();
        options.set("allow-compound-statements", true);
        check.parse_options_simple(&options);

        let line = LogicalLine::new("let x = 1; let y = 2;", 1);
        assert!(check.run(&CheckInput::Logical(&line)).unwrap().is_empty());
    }

    #[test]
    fn checks_ignore_foreign_inputs() {
        let tree = crate::input::SyntaxTree::new("fn main() {}");
        let input = CheckInput::Tree(&tree);

        assert!(LineLength::new().run(&input).unwrap().is_empty());
        assert!(TrailingWhitespace.run(&input).unwrap().is_empty());
        assert!(CompoundStatement::new().run(&input).unwrap().is_empty());
    }

    #[test]
    fn builtins_register_under_the_checks_namespace() {
        use crate::plugin::Registry;

        let mut registry = StaticRegistry::new();
        register_builtins(&mut registry);

        let names: Vec<_> = registry
            .enumerate(Checkers::NAMESPACE)
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            ["line-length", "trailing-whitespace", "compound-statement"]
        );
    }
}
