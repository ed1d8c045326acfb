//! Settings resolution.
//!
//! A [`SettingsResolver`] answers "what is the value of setting X?" for one
//! component, combining:
//! - the component's defaults table
//! - the host application's prefixed overrides
//! - deprecated settings that were renamed or replaced
//!
//! Typed getters turn string values into modules, objects and models, and
//! every result is cached until the override store changes.
//!
//! ```
//! use app_settings::deprecation::{DeprecatedSetting, WarningLog};
//! use app_settings::resolver::ResolverBuilder;
//! use app_settings::source::{DefaultsTable, MemoryOverrides, StaticDefaults};
//! use std::sync::Arc;
//!
//! let defaults = StaticDefaults::new().with(
//!     "polls.conf.defaults",
//!     DefaultsTable::from_bindings([("CHOICE_LIMIT", 10), ("MAX_CHOICES", 10)]),
//! );
//! let log = Arc::new(WarningLog::new());
//!
//! let resolver = ResolverBuilder::new("polls.conf.settings")
//!     .defaults_loader(defaults)
//!     .overrides(MemoryOverrides::new().with("POLLS_MAX_CHOICES", 4))
//!     .deprecations([DeprecatedSetting::new("MAX_CHOICES").renamed_to("CHOICE_LIMIT")])
//!     .warnings(Arc::clone(&log))
//!     .build()
//!     .unwrap();
//!
//! // The old override still applies, with a warning.
//! assert_eq!(resolver.get("CHOICE_LIMIT").unwrap().as_integer(), Some(4));
//! assert_eq!(log.len(), 1);
//! ```

mod builder;
mod cache;
mod engine;
mod error;
mod index;
mod lookup;
mod shortcuts;

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod engine_tests;

pub use builder::{
    AppSettings, ResolverBuilder, WarningPolicy, derive_defaults_path, derive_prefix,
};
pub use cache::CacheStats;
pub use engine::SettingsResolver;
pub use error::{DefinitionError, LookupFailure, ResolveError, ValueError, ValueErrorKind};
pub use lookup::{Lookup, ValueSource};
pub use shortcuts::{Models, Modules, Objects};
