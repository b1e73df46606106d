//! Typed managers for the three plugin categories
//!
//! Each category binds one namespace and layers whatever extra behavior
//! that category needs over [`PluginTypeManager`]:
//!
//! | Manager | Namespace | Extra behavior |
//! |---------|-----------|----------------|
//! | [`Checkers`] | `lintel.checks` | input-kind classification caches |
//! | [`Listeners`] | `lintel.listen` | builds the [`Notifier`] |
//! | [`ReportFormatters`] | `lintel.report` | none |

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, OnceLock};

use tracing::debug;

use super::manager::{Plugin, PluginTypeManager};
use super::notifier::Notifier;
use super::registry::Registry;
use crate::input::InputKind;

/// All of the checks registered with the host.
pub struct Checkers {
    inner: PluginTypeManager,
    ast: OnceLock<Vec<Arc<Plugin>>>,
    logical: OnceLock<Vec<Arc<Plugin>>>,
    physical: OnceLock<Vec<Arc<Plugin>>>,
}

impl Checkers {
    /// Namespace check extensions register under
    pub const NAMESPACE: &'static str = "lintel.checks";

    pub fn new(registry: &dyn Registry) -> Self {
        Self {
            inner: PluginTypeManager::new(registry, Self::NAMESPACE),
            ast: OnceLock::new(),
            logical: OnceLock::new(),
            physical: OnceLock::new(),
        }
    }

    /// Plugins that declared the given analysis input.
    ///
    /// Iterates the underlying mapping by value, so ordering follows the
    /// mapping's iteration order rather than discovery order.
    pub fn checks_expecting(&self, kind: InputKind) -> impl Iterator<Item = &Arc<Plugin>> + '_ {
        self.inner
            .plugins()
            .values()
            .filter(move |plugin| plugin.input() == kind)
    }

    /// Checks that consume the full syntax tree. Computed on first access
    /// and cached for the life of the process.
    pub fn ast_plugins(&self) -> &[Arc<Plugin>] {
        self.ast.get_or_init(|| {
            debug!("classifying tree checks");
            self.checks_expecting(InputKind::Tree).cloned().collect()
        })
    }

    /// Checks that consume logical lines. Cached on first access.
    pub fn logical_line_plugins(&self) -> &[Arc<Plugin>] {
        self.logical.get_or_init(|| {
            debug!("classifying logical-line checks");
            self.checks_expecting(InputKind::LogicalLine)
                .cloned()
                .collect()
        })
    }

    /// Checks that consume physical lines. Cached on first access.
    pub fn physical_line_plugins(&self) -> &[Arc<Plugin>] {
        self.physical.get_or_init(|| {
            debug!("classifying physical-line checks");
            self.checks_expecting(InputKind::PhysicalLine)
                .cloned()
                .collect()
        })
    }
}

impl Deref for Checkers {
    type Target = PluginTypeManager;

    fn deref(&self) -> &PluginTypeManager {
        &self.inner
    }
}

impl DerefMut for Checkers {
    fn deref_mut(&mut self) -> &mut PluginTypeManager {
        &mut self.inner
    }
}

/// All of the listeners registered with the host.
pub struct Listeners {
    inner: PluginTypeManager,
}

impl Listeners {
    /// Namespace listener extensions register under
    pub const NAMESPACE: &'static str = "lintel.listen";

    pub fn new(registry: &dyn Registry) -> Self {
        Self {
            inner: PluginTypeManager::new(registry, Self::NAMESPACE),
        }
    }

    /// Builds the routing structure for these listeners.
    ///
    /// Registration stores unloaded plugin handles; the notifier loads each
    /// listener the first time something is dispatched to it.
    pub fn build_notifier(&self) -> Notifier {
        let mut notifier = Notifier::new();
        for name in self.inner.names() {
            if let Some(plugin) = self.inner.get(name) {
                notifier.register_listener(name, plugin.clone());
            }
        }
        notifier
    }
}

impl Deref for Listeners {
    type Target = PluginTypeManager;

    fn deref(&self) -> &PluginTypeManager {
        &self.inner
    }
}

impl DerefMut for Listeners {
    fn deref_mut(&mut self) -> &mut PluginTypeManager {
        &mut self.inner
    }
}

/// All of the report formatters registered with the host.
pub struct ReportFormatters {
    inner: PluginTypeManager,
}

impl ReportFormatters {
    /// Namespace report-formatter extensions register under
    pub const NAMESPACE: &'static str = "lintel.report";

    pub fn new(registry: &dyn Registry) -> Self {
        Self {
            inner: PluginTypeManager::new(registry, Self::NAMESPACE),
        }
    }
}

impl Deref for ReportFormatters {
    type Target = PluginTypeManager;

    fn deref(&self) -> &PluginTypeManager {
        &self.inner
    }
}

impl DerefMut for ReportFormatters {
    fn deref_mut(&mut self) -> &mut PluginTypeManager {
        &mut self.inner
    }
}
