//! Violation routing for listener plugins
//!
//! Listeners register under a code prefix: a listener registered as `E1`
//! hears `E111` and `E1`, but not `W111`. Registration stores unloaded
//! plugin handles; a listener is only loaded the first time a violation is
//! dispatched to it.

use std::sync::Arc;

use tracing::{debug, warn};

use super::manager::{Plugin, PluginError};
use crate::violation::Violation;

/// Routes violations to the listeners whose registered prefix matches the
/// violation code.
#[derive(Debug, Default)]
pub struct Notifier {
    // Kept sorted by prefix so routing scans are deterministic.
    listeners: Vec<(String, Arc<Plugin>)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `plugin` to hear every code starting with `prefix`
    pub fn register_listener(&mut self, prefix: &str, plugin: Arc<Plugin>) {
        debug!(prefix, plugin = %plugin.name(), "registering listener");
        let at = self
            .listeners
            .partition_point(|(existing, _)| existing.as_str() <= prefix);
        self.listeners.insert(at, (prefix.to_string(), plugin));
    }

    /// Listener plugins interested in `code`
    pub fn listeners_for<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Arc<Plugin>> {
        self.listeners
            .iter()
            .filter(move |(prefix, _)| code.starts_with(prefix.as_str()))
            .map(|(_, plugin)| plugin)
    }

    /// Dispatches `violation` to every interested listener, loading each on
    /// first dispatch. A listener that fails to load aborts the dispatch.
    pub fn notify(&self, code: &str, violation: &Violation) -> Result<(), PluginError> {
        for plugin in self.listeners_for(code) {
            let ext = plugin.plugin()?;
            match ext.as_listener() {
                Some(listener) => listener.notify(code, violation),
                None => {
                    warn!(plugin = %plugin.name(), "plugin has no listener capability, skipping")
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::plugin::extension::{Extension, Listener};
    use crate::plugin::registry::{EntryPoint, StaticEntryPoint};

    struct RecordingListener {
        heard: Arc<Mutex<Vec<String>>>,
    }

    impl Extension for RecordingListener {
        fn name(&self) -> &str {
            "recording"
        }

        fn version(&self) -> &str {
            "0.1.0"
        }

        fn as_listener(&self) -> Option<&dyn Listener> {
            Some(self)
        }
    }

    impl Listener for RecordingListener {
        fn notify(&self, code: &str, _violation: &Violation) {
            self.heard.lock().unwrap().push(code.to_string());
        }
    }

    fn listener_plugin(prefix: &str, heard: Arc<Mutex<Vec<String>>>) -> Arc<Plugin> {
        let entry = StaticEntryPoint::new(move || {
            Arc::new(RecordingListener {
                heard: heard.clone(),
            })
        });
        Arc::new(Plugin::new(prefix, Arc::new(entry) as Arc<dyn EntryPoint>))
    }

    fn silent_plugin(prefix: &str) -> Arc<Plugin> {
        listener_plugin(prefix, Arc::new(Mutex::new(Vec::new())))
    }

    #[test]
    fn prefix_match_routes_codes() {
        let heard = Arc::new(Mutex::new(Vec::new()));
        let mut notifier = Notifier::new();
        notifier.register_listener("E1", listener_plugin("E1", heard.clone()));

        let violation = Violation::new("E111", "indentation is not a multiple of four", 1, 1);
        notifier.notify("E111", &violation).unwrap();
        notifier.notify("W111", &violation).unwrap();

        assert_eq!(heard.lock().unwrap().as_slice(), ["E111"]);
    }

    #[test]
    fn dispatch_loads_listener_on_demand() {
        let heard = Arc::new(Mutex::new(Vec::new()));
        let plugin = listener_plugin("E", heard.clone());
        let mut notifier = Notifier::new();
        notifier.register_listener("E", plugin.clone());

        assert!(!plugin.is_loaded());
        notifier
            .notify("E501", &Violation::new("E501", "line too long", 1, 80))
            .unwrap();
        assert!(plugin.is_loaded());
    }

    #[test]
    fn failing_listener_load_aborts_dispatch() {
        let entry = StaticEntryPoint::try_new(|| {
            Err(crate::plugin::registry::LoadError::Resolution(
                anyhow::anyhow!("boom"),
            ))
        });
        let plugin = Arc::new(Plugin::new("E", Arc::new(entry) as Arc<dyn EntryPoint>));

        let mut notifier = Notifier::new();
        notifier.register_listener("E", plugin);

        let result = notifier.notify("E501", &Violation::new("E501", "line too long", 1, 80));
        assert!(result.is_err());
    }

    #[test]
    fn exact_name_counts_as_prefix() {
        let mut notifier = Notifier::new();
        notifier.register_listener("E501", silent_plugin("E501"));

        assert_eq!(notifier.listeners_for("E501").count(), 1);
        assert_eq!(notifier.listeners_for("E5011").count(), 1);
        assert_eq!(notifier.listeners_for("E50").count(), 0);
    }

    // How many of `prefixes` match `code`, duplicates included.
    fn expected_matches(prefixes: &[String], code: &str) -> usize {
        prefixes.iter().filter(|p| code.starts_with(p.as_str())).count()
    }

    proptest! {
        #[test]
        fn routed_listeners_always_match_their_prefix(
            prefixes in prop::collection::vec("[EWC][0-9]{0,3}", 1..8),
            code in "[EWC][0-9]{3}",
        ) {
            let mut notifier = Notifier::new();
            for prefix in &prefixes {
                notifier.register_listener(prefix, silent_plugin(prefix));
            }

            let routed: Vec<_> = notifier
                .listeners_for(&code)
                .map(|p| p.name().to_string())
                .collect();

            for name in &routed {
                prop_assert!(code.starts_with(name.as_str()));
            }
            prop_assert_eq!(routed.len(), expected_matches(&prefixes, &code));
        }
    }
}
