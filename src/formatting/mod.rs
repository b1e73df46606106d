//! Report formatting
//!
//! Report formatters are plugins registered under `lintel.report`. Each one
//! implements the [`Formatter`] contract; the host resolves the configured
//! formatter through [`crate::plugin::ReportFormatters`] and drives it
//! through its lifecycle. The built-in text formatter ships here and goes
//! through the same registry as third-party ones.

mod base;
mod text;

pub use base::{FormatError, Formatter, OutputSink};
pub use text::{TextFormatter, TextFormatterFactory};

use std::sync::Arc;

use crate::plugin::{ReportFormatters, StaticEntryPoint, StaticRegistry};

/// Registers the bundled report formatters on `registry`
pub fn register_builtins(registry: &mut StaticRegistry) {
    registry.register(
        ReportFormatters::NAMESPACE,
        "default",
        StaticEntryPoint::new(|| Arc::new(TextFormatterFactory)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Registry;

    #[test]
    fn builtin_formatter_is_registered_as_default() {
        let mut registry = StaticRegistry::new();
        register_builtins(&mut registry);

        let entries = registry.enumerate(ReportFormatters::NAMESPACE);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "default");
    }
}
