//! Default text formatter
//!
//! Renders violations as `path:line:col: CODE message`, the format most
//! editors and CI systems already know how to parse.

use crate::options::Options;
use crate::plugin::{Extension, FormatterFactory};
use crate::violation::Violation;

use super::base::{Formatter, OutputSink};

/// The built-in `path:line:col: CODE message` formatter
pub struct TextFormatter {
    sink: OutputSink,
}

impl TextFormatter {
    pub fn new(options: &Options) -> Self {
        Self {
            sink: OutputSink::new(options.output_file.clone()),
        }
    }
}

impl Formatter for TextFormatter {
    fn sink(&mut self) -> &mut OutputSink {
        &mut self.sink
    }

    fn format(&mut self, violation: &Violation) -> String {
        let filename = violation
            .filename
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "<input>".to_string());
        format!(
            "{filename}:{}:{}: {} {}",
            violation.line, violation.column, violation.code, violation.message
        )
    }
}

/// Registry-facing wrapper that builds [`TextFormatter`]s
pub struct TextFormatterFactory;

impl Extension for TextFormatterFactory {
    fn name(&self) -> &str {
        "text"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn as_formatter_factory(&self) -> Option<&dyn FormatterFactory> {
        Some(self)
    }
}

impl FormatterFactory for TextFormatterFactory {
    fn make(&self, options: &Options) -> Box<dyn Formatter> {
        let mut formatter = TextFormatter::new(options);
        formatter.after_init();
        Box::new(formatter)
    }
}
