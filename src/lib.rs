//! Lintel - A plugin-driven static-analysis toolkit for source code
//!
//! Lintel is the plugin-management layer of a static-analysis tool: it
//! discovers checks, listeners, and report formatters registered with the
//! host, loads them lazily, classifies checks by the analysis input they
//! consume, and wires plugin options into a shared registry. The execution
//! engine that drives checks over source files plugs in from outside.

pub mod checks;
pub mod cli;
pub mod config;
pub mod formatting;
pub mod input;
pub mod options;
pub mod plugin;
pub mod violation;

pub use input::{CheckInput, InputKind, LogicalLine, PhysicalLine, SyntaxTree};
pub use options::{OptionRegistry, OptionSpec, Options};
pub use plugin::{Checkers, Listeners, Notifier, Plugin, PluginError, ReportFormatters};
pub use violation::Violation;
