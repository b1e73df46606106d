//! The capability interface loaded extensions implement
//!
//! Every extension implements [`Extension`], a fixed interface where the
//! optional hooks default to no-ops. There is no runtime probing for hook
//! presence: a plugin that has nothing to register simply inherits the
//! defaults.
//!
//! Option provisioning supports two hook shapes, because extension authors
//! conforming to two different option-provider contracts coexist. The full
//! shape receives the registry, the parsed options, and leftover positional
//! arguments; the reduced shape receives only the options. An extension
//! overrides exactly one of the two. The default full-shape implementation
//! reports a signature mismatch so the caller knows to retry with the
//! reduced shape.

use crate::formatting::Formatter;
use crate::input::CheckInput;
use crate::options::{OptionRegistry, Options, OptionsError};
use crate::violation::Violation;

/// Behavior shared by every loadable extension.
pub trait Extension: Send + Sync {
    /// Name the extension declares for itself. May differ from the name it
    /// was registered under.
    fn name(&self) -> &str;

    /// Version the extension declares for itself
    fn version(&self) -> &str;

    /// Contributes this extension's command-line options. Default: nothing
    /// to contribute.
    fn add_options(&self, _registry: &mut OptionRegistry) {}

    /// Full-shape option hook. The default reports a signature mismatch,
    /// which makes the caller fall back to [`Extension::parse_options_simple`].
    fn parse_options(
        &self,
        _registry: &OptionRegistry,
        _options: &Options,
        _extra_args: &[String],
    ) -> Result<(), OptionsError> {
        Err(OptionsError::SignatureMismatch)
    }

    /// Reduced-shape option hook receiving only the parsed options.
    /// Default: no-op.
    fn parse_options_simple(&self, _options: &Options) {}

    /// This extension viewed as a check, when it is one
    fn as_check(&self) -> Option<&dyn Check> {
        None
    }

    /// This extension viewed as a listener, when it is one
    fn as_listener(&self) -> Option<&dyn Listener> {
        None
    }

    /// This extension viewed as a formatter factory, when it is one
    fn as_formatter_factory(&self) -> Option<&dyn FormatterFactory> {
        None
    }
}

impl std::fmt::Debug for dyn Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.name())
            .field("version", &self.version())
            .finish()
    }
}

/// A check inspects one analysis input and reports violations.
///
/// Errors from a check propagate to the caller unmodified; the plugin layer
/// never swallows them.
pub trait Check: Send + Sync {
    fn run(&self, input: &CheckInput<'_>) -> anyhow::Result<Vec<Violation>>;
}

/// A listener hears violations routed to it by code prefix.
pub trait Listener: Send + Sync {
    fn notify(&self, code: &str, violation: &Violation);
}

/// Builds report formatters configured from the parsed options.
pub trait FormatterFactory: Send + Sync {
    fn make(&self, options: &Options) -> Box<dyn Formatter>;
}
