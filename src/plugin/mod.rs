//! # Plugin System
//!
//! Discovery, loading, and wiring for the extensions Lintel runs.
//!
//! ## Overview
//!
//! Extensions are registered with the host environment under named
//! categories and loaded lazily: discovery only records entry-point
//! handles, and a plugin resolves to a live object the first time
//! something touches it. Resolution happens at most once per plugin and
//! one failure never poisons the rest of the set.
//!
//! ## Plugin Categories
//!
//! | Namespace | Manager | Purpose |
//! |-----------|---------|---------|
//! | `lintel.checks` | [`Checkers`] | Checks, classified by input kind |
//! | `lintel.listen` | [`Listeners`] | Violation listeners |
//! | `lintel.report` | [`ReportFormatters`] | Report formatters |
//!
//! ## Startup Flow
//!
//! ```text
//! namespace ──► discovery ──► Plugin handles ──► typed manager
//!                                                   │
//!                            ┌──────────────────────┼────────────────┐
//!                            ▼                      ▼                ▼
//!                     option registry      classification      notifier
//! ```
//!
//! After startup the execution engine asks [`Checkers`] for its
//! classification lists and calls the plugins directly; nothing here runs
//! checks itself.
//!
//! ## Key Types
//!
//! - [`Registry`] / [`StaticRegistry`] - the host's extension table
//! - [`EntryPoint`] - an installable, not-yet-loaded extension
//! - [`Extension`] - the capability interface loaded objects implement
//! - [`Plugin`] / [`PluginManager`] / [`PluginTypeManager`] - load state
//!   and lifecycle
//! - [`Notifier`] - code-prefix routing for listeners

mod categories;
mod extension;
mod manager;
mod notifier;
mod registry;

pub use categories::{Checkers, Listeners, ReportFormatters};
pub use extension::{Check, Extension, FormatterFactory, Listener};
pub use manager::{Plugin, PluginError, PluginManager, PluginTypeManager};
pub use notifier::Notifier;
pub use registry::{EntryPoint, LoadError, Registry, StaticEntryPoint, StaticRegistry};
