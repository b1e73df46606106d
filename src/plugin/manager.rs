//! Plugin discovery and lazy loading
//!
//! A [`Plugin`] wraps one discovered entry point and owns its load state:
//! resolution happens on first access and the result is cached for the life
//! of the process, never replaced. A [`PluginManager`] discovers everything
//! registered under one namespace, exactly once, at construction.
//! [`PluginTypeManager`] layers typed lifecycle behavior on top: bulk
//! loading, option registration, and option provisioning.
//!
//! Loading is deliberately not transactional. When a bulk load hits a bad
//! plugin the error propagates and the loaded flag stays unset, but plugins
//! that already resolved stay resolved; retrying after the bad plugin is
//! fixed completes the set.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use thiserror::Error;
use tracing::{debug, error, info};

use super::extension::Extension;
use super::registry::{EntryPoint, LoadError, Registry};
use crate::input::{CheckInput, InputKind};
use crate::options::{OptionRegistry, Options, OptionsError};
use crate::violation::Violation;

#[derive(Debug, Error)]
pub enum PluginError {
    /// An entry point could not be loaded. Carries the registered name of
    /// the failing plugin and the underlying cause.
    #[error("failed to load plugin \"{name}\": {source}")]
    FailedToLoad {
        name: String,
        #[source]
        source: LoadError,
    },
}

/// One discovered extension: its registered name, the entry-point handle,
/// and the write-once loaded object.
pub struct Plugin {
    name: String,
    entry: Arc<dyn EntryPoint>,
    input: InputKind,
    loaded: OnceLock<Arc<dyn Extension>>,
}

impl Plugin {
    pub(crate) fn new(name: impl Into<String>, entry: Arc<dyn EntryPoint>) -> Self {
        let input = entry.input();
        Self {
            name: name.into(),
            entry,
            input,
            loaded: OnceLock::new(),
        }
    }

    /// Name the plugin was registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Analysis input the plugin declared at registration
    pub fn input(&self) -> InputKind {
        self.input
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Resolves the entry point and caches the result. Resolution happens
    /// at most once; later calls return the cached object. On failure the
    /// plugin stays unloaded and the call may be retried.
    ///
    /// With `verify_requirements` set, the entry point's declared
    /// requirements are verified before resolving.
    pub fn load_plugin(&self, verify_requirements: bool) -> Result<Arc<dyn Extension>, PluginError> {
        if let Some(loaded) = self.loaded.get() {
            return Ok(loaded.clone());
        }

        info!(plugin = %self.name, "loading plugin from entry point");
        let loaded = self.load(verify_requirements).map_err(|source| {
            let failed = PluginError::FailedToLoad {
                name: self.name.clone(),
                source,
            };
            error!("{failed}");
            failed
        })?;

        // First write wins; concurrent first loads are out of contract
        // (startup is single-threaded), so a lost race just drops the
        // duplicate object.
        Ok(self.loaded.get_or_init(move || loaded).clone())
    }

    fn load(&self, verify_requirements: bool) -> Result<Arc<dyn Extension>, LoadError> {
        if verify_requirements {
            debug!(plugin = %self.name, "verifying plugin requirements");
            self.entry.verify()?;
        }
        self.entry.resolve()
    }

    /// The loaded extension, loading it on first access
    pub fn plugin(&self) -> Result<Arc<dyn Extension>, PluginError> {
        self.load_plugin(false)
    }

    /// Version the loaded extension declares (loads on first access)
    pub fn version(&self) -> Result<String, PluginError> {
        Ok(self.plugin()?.version().to_string())
    }

    /// Runs the loaded extension as a check against `input`. Errors from
    /// the check itself propagate unmodified.
    pub fn execute(&self, input: &CheckInput<'_>) -> anyhow::Result<Vec<Violation>> {
        let ext = self.plugin()?;
        let check = ext.as_check().ok_or_else(|| {
            anyhow::anyhow!("plugin \"{}\" is not executable as a check", self.name)
        })?;
        check.run(input)
    }

    /// Hands the parsed options to the extension. The full hook signature
    /// is tried first; a signature mismatch falls back to the reduced one.
    pub fn provide_options(
        &self,
        registry: &OptionRegistry,
        options: &Options,
        extra_args: &[String],
    ) -> Result<(), PluginError> {
        let ext = self.plugin()?;
        debug!(plugin = %self.name, "providing options to plugin");
        match ext.parse_options(registry, options, extra_args) {
            Ok(()) => {}
            Err(OptionsError::SignatureMismatch) => ext.parse_options_simple(options),
        }
        Ok(())
    }

    /// Lets the extension contribute its options, then records its identity
    /// for later reporting
    pub fn register_options(&self, registry: &mut OptionRegistry) -> Result<(), PluginError> {
        let ext = self.plugin()?;
        debug!(plugin = %self.name, "registering options for plugin");
        ext.add_options(registry);
        registry.register_plugin(&self.name, ext.name(), ext.version());
        Ok(())
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("input", &self.input)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Finds and manages the plugins registered under one namespace.
pub struct PluginManager {
    namespace: String,
    plugins: HashMap<String, Arc<Plugin>>,
    names: Vec<String>,
}

impl PluginManager {
    /// Discovers every extension registered under `namespace`. Discovery
    /// runs once; the resulting set never changes afterwards.
    pub fn new(registry: &dyn Registry, namespace: &str) -> Self {
        info!(namespace, "discovering plugins");
        let mut plugins = HashMap::new();
        let mut names = Vec::new();
        for (name, entry) in registry.enumerate(namespace) {
            if plugins.contains_key(&name) {
                debug!(namespace, plugin = %name, "duplicate name from registry, keeping first");
                continue;
            }
            debug!(namespace, plugin = %name, "discovered plugin");
            names.push(name.clone());
            plugins.insert(name.clone(), Arc::new(Plugin::new(name, entry)));
        }
        Self {
            namespace: namespace.to_string(),
            plugins,
            names,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registered names in discovery order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn plugins(&self) -> &HashMap<String, Arc<Plugin>> {
        &self.plugins
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Plugin>> {
        self.plugins.get(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Applies `f` to every plugin in discovery order, yielding the results
    /// lazily.
    pub fn map<'a, T, F>(&'a self, mut f: F) -> impl Iterator<Item = T> + 'a
    where
        F: FnMut(&'a Arc<Plugin>) -> T + 'a,
    {
        self.names.iter().map(move |name| f(&self.plugins[name]))
    }
}

/// Typed lifecycle behavior layered over a [`PluginManager`]: bulk loading,
/// option registration, and option provisioning.
pub struct PluginTypeManager {
    manager: PluginManager,
    plugins_loaded: bool,
}

impl PluginTypeManager {
    pub fn new(registry: &dyn Registry, namespace: &str) -> Self {
        Self {
            manager: PluginManager::new(registry, namespace),
            plugins_loaded: false,
        }
    }

    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    pub fn namespace(&self) -> &str {
        self.manager.namespace()
    }

    pub fn names(&self) -> &[String] {
        self.manager.names()
    }

    pub fn plugins(&self) -> &HashMap<String, Arc<Plugin>> {
        self.manager.plugins()
    }

    pub fn contains(&self, name: &str) -> bool {
        debug!(name, "checking for name in plugin type manager");
        self.manager.plugins().contains_key(name)
    }

    /// Plugin registered as `name`, or `None` for unknown names
    pub fn get(&self, name: &str) -> Option<&Arc<Plugin>> {
        self.manager.get(name)
    }

    /// Whether a bulk load has completed without error
    pub fn plugins_loaded(&self) -> bool {
        self.plugins_loaded
    }

    /// Loads every plugin of this type and returns the loaded objects.
    ///
    /// Idempotent: once a bulk load has succeeded, later calls return an
    /// empty list without touching the plugins. A load failure propagates
    /// and leaves the loaded flag unset so the call can be retried; plugins
    /// that already resolved stay resolved.
    pub fn load_plugins(&mut self) -> Result<Vec<Arc<dyn Extension>>, PluginError> {
        if self.plugins_loaded {
            return Ok(Vec::new());
        }

        let loaded = self
            .manager
            .map(|plugin| plugin.load_plugin(false))
            .collect::<Result<Vec<_>, _>>()?;
        self.plugins_loaded = true;
        Ok(loaded)
    }

    /// Registers every plugin's options and identity, loading first
    pub fn register_options(&mut self, registry: &mut OptionRegistry) -> Result<(), PluginError> {
        self.load_plugins()?;
        for result in self.manager.map(|plugin| plugin.register_options(registry)) {
            result?;
        }
        Ok(())
    }

    /// Hands the parsed options to every plugin. Does not force a bulk
    /// load; each access loads lazily.
    pub fn provide_options(
        &self,
        registry: &OptionRegistry,
        options: &Options,
        extra_args: &[String],
    ) -> Result<(), PluginError> {
        for result in self
            .manager
            .map(|plugin| plugin.provide_options(registry, options, extra_args))
        {
            result?;
        }
        Ok(())
    }
}

impl std::ops::Index<&str> for PluginTypeManager {
    type Output = Arc<Plugin>;

    fn index(&self, name: &str) -> &Arc<Plugin> {
        self.get(name)
            .unwrap_or_else(|| panic!("no plugin registered as \"{name}\""))
    }
}
