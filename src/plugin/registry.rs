//! Host extension registry
//!
//! The host environment keeps a table of installable extensions keyed by
//! namespace. Discovery asks the [`Registry`] for everything registered
//! under one namespace and gets back ordered `(name, entry point)` pairs;
//! nothing is loaded at that point. An [`EntryPoint`] is the opaque handle
//! that can later be resolved into a live [`Extension`], optionally after
//! verifying its declared requirements.
//!
//! The production implementation is [`StaticRegistry`], a linked-in table
//! the host binary fills at startup. Tests hand the managers canned entry
//! points the same way.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::extension::Extension;
use crate::input::InputKind;

/// Why an entry point could not be turned into a live extension
#[derive(Debug, Error)]
pub enum LoadError {
    /// A declared requirement is not satisfiable in this environment
    #[error("unmet requirement: {0}")]
    Requirement(String),

    /// Resolution itself failed
    #[error("resolution failed: {0:#}")]
    Resolution(anyhow::Error),
}

/// An installable, not-yet-loaded extension implementation.
pub trait EntryPoint: Send + Sync {
    /// Resolves the handle to a concrete extension object
    fn resolve(&self) -> Result<Arc<dyn Extension>, LoadError>;

    /// Verifies declared requirements are satisfiable. Default: none
    /// declared.
    fn verify(&self) -> Result<(), LoadError> {
        Ok(())
    }

    /// Analysis input this extension consumes, declared at registration.
    /// Only meaningful for check extensions; everything else stays `Other`.
    fn input(&self) -> InputKind {
        InputKind::Other
    }
}

/// Ordered table of extensions registered under namespaces.
pub trait Registry: Send + Sync {
    /// Enumerates the `(name, entry point)` pairs registered under
    /// `namespace`, in registration order. Unknown namespaces are empty.
    fn enumerate(&self, namespace: &str) -> Vec<(String, Arc<dyn EntryPoint>)>;
}

/// Entry point backed by a constructor linked into the host binary.
pub struct StaticEntryPoint {
    ctor: Box<dyn Fn() -> Result<Arc<dyn Extension>, LoadError> + Send + Sync>,
    input: InputKind,
}

impl StaticEntryPoint {
    /// Wraps an infallible constructor
    pub fn new(ctor: impl Fn() -> Arc<dyn Extension> + Send + Sync + 'static) -> Self {
        Self {
            ctor: Box::new(move || Ok(ctor())),
            input: InputKind::Other,
        }
    }

    /// Wraps a constructor that can fail to resolve
    pub fn try_new(
        ctor: impl Fn() -> Result<Arc<dyn Extension>, LoadError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            ctor: Box::new(ctor),
            input: InputKind::Other,
        }
    }

    /// Declares the analysis input the extension consumes
    pub fn with_input(mut self, input: InputKind) -> Self {
        self.input = input;
        self
    }
}

impl EntryPoint for StaticEntryPoint {
    fn resolve(&self) -> Result<Arc<dyn Extension>, LoadError> {
        (self.ctor)()
    }

    fn input(&self) -> InputKind {
        self.input
    }
}

/// In-process registration table, filled by the host at startup.
#[derive(Default)]
pub struct StaticRegistry {
    namespaces: HashMap<String, Vec<(String, Arc<dyn EntryPoint>)>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entry point under a namespace. The first registration
    /// of a name wins; later ones are ignored.
    pub fn register(&mut self, namespace: &str, name: &str, entry: impl EntryPoint + 'static) {
        let entries = self.namespaces.entry(namespace.to_string()).or_default();
        if entries.iter().any(|(existing, _)| existing == name) {
            debug!(namespace, name, "entry point already registered, ignoring");
            return;
        }
        debug!(namespace, name, "registered entry point");
        let entry: Arc<dyn EntryPoint> = Arc::new(entry);
        entries.push((name.to_string(), entry));
    }
}

impl Registry for StaticRegistry {
    fn enumerate(&self, namespace: &str) -> Vec<(String, Arc<dyn EntryPoint>)> {
        self.namespaces.get(namespace).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionRegistry;

    struct Noop;

    impl Extension for Noop {
        fn name(&self) -> &str {
            "noop"
        }

        fn version(&self) -> &str {
            "0.0.1"
        }
    }

    #[test]
    fn unknown_namespace_is_empty() {
        let registry = StaticRegistry::new();
        assert!(registry.enumerate("lintel.checks").is_empty());
    }

    #[test]
    fn enumeration_preserves_registration_order() {
        let mut registry = StaticRegistry::new();
        registry.register("demo", "b", StaticEntryPoint::new(|| Arc::new(Noop)));
        registry.register("demo", "a", StaticEntryPoint::new(|| Arc::new(Noop)));
        registry.register("demo", "c", StaticEntryPoint::new(|| Arc::new(Noop)));

        let names: Vec<_> = registry
            .enumerate("demo")
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = StaticRegistry::new();
        registry.register(
            "demo",
            "dup",
            StaticEntryPoint::new(|| Arc::new(Noop)).with_input(InputKind::Tree),
        );
        registry.register("demo", "dup", StaticEntryPoint::new(|| Arc::new(Noop)));

        let entries = registry.enumerate("demo");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1.input(), InputKind::Tree);
    }

    #[test]
    fn static_entry_point_resolves() {
        let entry = StaticEntryPoint::new(|| Arc::new(Noop));

        let ext = entry.resolve().unwrap();
        assert_eq!(ext.name(), "noop");

        // Defaults carried by the trait
        assert!(entry.verify().is_ok());
        assert_eq!(entry.input(), InputKind::Other);

        let mut options = OptionRegistry::new();
        ext.add_options(&mut options);
        assert!(options.options().is_empty());
    }

    #[test]
    fn failing_ctor_surfaces_resolution_error() {
        let entry = StaticEntryPoint::try_new(|| {
            Err(LoadError::Resolution(anyhow::anyhow!("linker said no")))
        });

        let err = entry.resolve().unwrap_err();
        assert!(matches!(err, LoadError::Resolution(_)));
    }
}
