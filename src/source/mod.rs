//! Collaborators a resolver reads from.
//!
//! This module provides traits and in-memory/file-backed implementations for:
//! - Default value tables ([`DefaultsLoader`], [`DefaultsTable`])
//! - Host application overrides ([`OverrideStore`], [`MemoryOverrides`], [`EnvOverrides`])
//! - Change notification ([`ChangeNotifier`], [`Subscription`])
//! - Dotted-path imports ([`Importer`], [`ModuleTable`], [`Module`])
//! - Data-model lookups ([`ModelRegistry`], [`ModelTable`], [`Model`])
//!
//! Each trait is the narrow seam the resolver depends on; tests swap in
//! their own implementations.

mod defaults;
mod error;
mod importer;
mod models;
mod notify;
mod overrides;

#[cfg(test)]
mod importer_tests;
#[cfg(test)]
mod notify_tests;

pub use defaults::{
    DefaultsLoader, DefaultsTable, StaticDefaults, TomlDefaultsLoader, is_setting_name,
};
pub use error::{DefaultsError, ImportError, ModelLookupError, OverridesError};
pub use importer::{Importer, Module, ModuleTable, Object, is_dotted_path};
pub use models::{Model, ModelRegistry, ModelTable};
pub use notify::{ChangeNotifier, Listener, Subscription};
pub use overrides::{EnvOverrides, MemoryOverrides, OverrideStore};
