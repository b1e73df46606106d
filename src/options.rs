//! Shared option registry and parsed options
//!
//! Plugins contribute command-line options into one [`OptionRegistry`]
//! during startup, together with an identity record used for version
//! reporting. The registry can extend a `clap` command with everything that
//! was contributed. Parsed values travel back to the plugins as an
//! [`Options`] object whose plugin-defined entries are passed through
//! untouched.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptionsError {
    /// The full option hook signature is not implemented by this plugin.
    /// Callers fall back to the reduced signature.
    #[error("option hook does not accept the full signature")]
    SignatureMismatch,
}

/// One command-line option contributed by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSpec {
    /// Long flag name without the leading dashes, e.g. `max-line-length`
    pub long: String,

    /// Optional short flag
    pub short: Option<char>,

    /// Help text
    pub help: String,

    /// Whether the option takes a value; `false` makes it a boolean flag
    pub takes_value: bool,

    /// Default value, rendered as a string
    pub default: Option<String>,
}

impl OptionSpec {
    /// Creates a boolean flag with the given long name
    pub fn new(long: impl Into<String>) -> Self {
        Self {
            long: long.into(),
            short: None,
            help: String::new(),
            takes_value: false,
            default: None,
        }
    }

    pub fn with_short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Makes the option value-taking without a default
    pub fn with_value(mut self) -> Self {
        self.takes_value = true;
        self
    }

    /// Makes the option value-taking with a default
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.takes_value = true;
        self.default = Some(default.into());
        self
    }
}

/// Identity record for a plugin that went through option registration.
///
/// `entry_point` is the name the plugin was registered under; `name` and
/// `version` are what the loaded object declares about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginIdentity {
    pub entry_point: String,
    pub name: String,
    pub version: String,
}

/// The registry plugins contribute their options into.
#[derive(Debug, Default)]
pub struct OptionRegistry {
    options: Vec<OptionSpec>,
    plugins: Vec<PluginIdentity>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one option spec. Contributions are kept in registration order.
    pub fn add_option(&mut self, spec: OptionSpec) {
        self.options.push(spec);
    }

    /// Records the identity of a plugin for later reporting
    pub fn register_plugin(&mut self, entry_point: &str, name: &str, version: &str) {
        self.plugins.push(PluginIdentity {
            entry_point: entry_point.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        });
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn registered_plugins(&self) -> &[PluginIdentity] {
        &self.plugins
    }

    /// Extends a `clap` command with every contributed option
    pub fn extend_command(&self, mut command: clap::Command) -> clap::Command {
        for spec in &self.options {
            let mut arg = clap::Arg::new(spec.long.clone()).long(spec.long.clone());
            if !spec.help.is_empty() {
                arg = arg.help(spec.help.clone());
            }
            if let Some(short) = spec.short {
                arg = arg.short(short);
            }
            if spec.takes_value {
                arg = arg.action(clap::ArgAction::Set);
                if let Some(default) = &spec.default {
                    arg = arg.default_value(default.clone());
                }
            } else {
                arg = arg.action(clap::ArgAction::SetTrue);
            }
            command = command.arg(arg);
        }
        command
    }
}

/// Parsed configuration handed through to plugins unchanged.
///
/// Plugin-defined values are keyed by the long option name. The few fields
/// the core itself consumes (the report output path) are lifted out.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Options {
    /// Where report output goes; stdout when unset
    pub output_file: Option<PathBuf>,

    /// Plugin-defined option values
    pub values: HashMap<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value as an unsigned integer. Accepts both numbers and numeric
    /// strings, since CLI values arrive as strings and config values as
    /// numbers.
    pub fn get_usize(&self, key: &str) -> Option<usize> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().map(|n| n as usize),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_builder() {
        let spec = OptionSpec::new("max-line-length")
            .with_help("Maximum line length")
            .with_default("79");

        assert_eq!(spec.long, "max-line-length");
        assert!(spec.takes_value);
        assert_eq!(spec.default.as_deref(), Some("79"));
    }

    #[test]
    fn flag_spec_takes_no_value() {
        let spec = OptionSpec::new("quiet").with_short('q');

        assert!(!spec.takes_value);
        assert_eq!(spec.short, Some('q'));
    }

    #[test]
    fn registry_keeps_registration_order() {
        let mut registry = OptionRegistry::new();
        registry.add_option(OptionSpec::new("first"));
        registry.add_option(OptionSpec::new("second"));

        let longs: Vec<_> = registry.options().iter().map(|o| o.long.as_str()).collect();
        assert_eq!(longs, ["first", "second"]);
    }

    #[test]
    fn registry_records_plugin_identity() {
        let mut registry = OptionRegistry::new();
        registry.register_plugin("line-length", "line-length", "0.1.0");

        assert_eq!(registry.registered_plugins().len(), 1);
        assert_eq!(registry.registered_plugins()[0].entry_point, "line-length");
    }

    #[test]
    fn extend_command_parses_contributed_options() {
        let mut registry = OptionRegistry::new();
        registry.add_option(OptionSpec::new("max-line-length").with_default("79"));
        registry.add_option(OptionSpec::new("quiet"));

        let command = registry.extend_command(clap::Command::new("lintel"));
        let matches = command
            .try_get_matches_from(["lintel", "--max-line-length", "120", "--quiet"])
            .unwrap();

        assert_eq!(
            matches.get_one::<String>("max-line-length").map(String::as_str),
            Some("120")
        );
        assert!(matches.get_flag("quiet"));
    }

    #[test]
    fn extend_command_applies_defaults() {
        let mut registry = OptionRegistry::new();
        registry.add_option(OptionSpec::new("max-line-length").with_default("79"));

        let command = registry.extend_command(clap::Command::new("lintel"));
        let matches = command.try_get_matches_from(["lintel"]).unwrap();

        assert_eq!(
            matches.get_one::<String>("max-line-length").map(String::as_str),
            Some("79")
        );
    }

    #[test]
    fn options_get_usize_accepts_numbers_and_strings() {
        let mut options = Options::new();
        options.set("from-config", 120);
        options.set("from-cli", "99");

        assert_eq!(options.get_usize("from-config"), Some(120));
        assert_eq!(options.get_usize("from-cli"), Some(99));
        assert_eq!(options.get_usize("missing"), None);
    }
}
