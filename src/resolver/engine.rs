//! The settings resolver.

use std::sync::Arc;

use super::builder::WarningPolicy;
use super::cache::{CacheKey, CacheStats, Caches, Entry, RawEntry};
use super::error::{LookupFailure, ResolveError, ValueError, ValueErrorKind};
use super::index::DeprecationIndex;
use super::lookup::{Lookup, ValueSource};
use crate::deprecation::{DeprecatedSetting, DeprecationWarning, WarningSink, prefixed_name};
use crate::source::{
    DefaultsTable, Importer, Model, ModelLookupError, ModelRegistry, Module, Object,
    OverrideStore, Subscription,
};
use crate::value::{SettingValue, TypeRequirement, ValueKind};

/// Resolves a component's settings.
///
/// A value comes from, in order of precedence:
/// 1. an override under the setting's own prefixed name
/// 2. an override under the prefixed name of a deprecated setting it replaces
/// 3. the component's default
///
/// Raw values and the results of the typed getters are cached until
/// [`Self::clear_caches`] is called or the override store reports a change.
///
/// Built with [`super::ResolverBuilder`].
pub struct SettingsResolver {
    pub(super) module_path: String,
    pub(super) prefix: String,
    pub(super) defaults_path: String,
    pub(super) defaults: DefaultsTable,
    pub(super) index: DeprecationIndex,
    pub(super) overrides: Arc<dyn OverrideStore>,
    pub(super) importer: Arc<dyn Importer>,
    pub(super) models: Arc<dyn ModelRegistry>,
    pub(super) warnings: Arc<dyn WarningSink>,
    pub(super) policy: WarningPolicy,
    pub(super) caches: Arc<Caches>,
    pub(super) subscription: Subscription,
}

impl std::fmt::Debug for SettingsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsResolver")
            .field("module_path", &self.module_path)
            .field("prefix", &self.prefix)
            .field("defaults_path", &self.defaults_path)
            .field("settings", &self.defaults.len())
            .field("deprecations", &self.index.len())
            .field("policy", &self.policy)
            .field("caches", &self.caches)
            .finish_non_exhaustive()
    }
}

impl SettingsResolver {
    // --- Introspection ---

    /// Path of the module the settings are defined in.
    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Prefix applied to setting names in the override store.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Dotted path the defaults were loaded from.
    #[must_use]
    pub fn defaults_path(&self) -> &str {
        &self.defaults_path
    }

    /// The loaded defaults.
    #[must_use]
    pub const fn defaults(&self) -> &DefaultsTable {
        &self.defaults
    }

    /// Declared setting names, sorted.
    pub fn setting_names(&self) -> impl Iterator<Item = &str> {
        self.defaults.names()
    }

    /// When deprecation warnings are emitted.
    #[must_use]
    pub const fn warning_policy(&self) -> WarningPolicy {
        self.policy
    }

    /// Returns `true` if `name` has a default.
    #[must_use]
    pub fn in_defaults(&self, name: &str) -> bool {
        self.defaults.contains(name)
    }

    /// The default for `name`, ignoring overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoDefault`] if `name` has no default.
    pub fn default_value(&self, name: &str) -> Result<&SettingValue, ResolveError> {
        self.defaults
            .get(name)
            .ok_or_else(|| ResolveError::NoDefault {
                setting_name: name.to_string(),
                defaults_path: self.defaults_path.clone(),
            })
    }

    /// The name under which the override store holds `name`.
    #[must_use]
    pub fn prefixed_setting_name(&self, name: &str) -> String {
        prefixed_name(&self.prefix, name)
    }

    /// Returns `true` if the host application overrides `name`.
    #[must_use]
    pub fn is_overridden(&self, name: &str) -> bool {
        self.overrides.contains(&self.prefixed_setting_name(name))
    }

    /// The deprecation record for `name`, if it is deprecated.
    #[must_use]
    pub fn deprecation(&self, name: &str) -> Option<&DeprecatedSetting> {
        self.index.get(name)
    }

    /// Deprecation records in declaration order.
    pub fn deprecations(&self) -> impl Iterator<Item = &DeprecatedSetting> {
        self.index.iter()
    }

    /// Names of the deprecated settings replaced by `name`.
    #[must_use]
    pub fn replaced_settings(&self, name: &str) -> &[String] {
        self.index.sources_for(name)
    }

    /// Entry counts for each cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.caches.stats()
    }

    /// Returns `true` while caches are cleared on override changes.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stops listening for override changes.
    ///
    /// Caches must then be cleared by hand with [`Self::clear_caches`].
    pub fn unsubscribe(&mut self) {
        std::mem::replace(&mut self.subscription, Subscription::detached()).cancel();
    }

    /// Empties every cache at once.
    pub fn clear_caches(&self) {
        self.caches.clear();
        tracing::debug!(module = %self.module_path, "Setting caches cleared");
    }

    // --- Raw values ---

    /// Returns the value of a declared setting.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownSetting`] if `name` has no default,
    /// otherwise as [`Self::get_raw`].
    pub fn get(&self, name: &str) -> Result<SettingValue, ResolveError> {
        self.require_known(name)?;
        self.get_raw(name)
    }

    /// Resolves `name` with default lookup options.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NoDefault`] if `name` is neither overridden
    /// nor declared.
    pub fn get_raw(&self, name: &str) -> Result<SettingValue, ResolveError> {
        self.get_raw_with(name, &Lookup::new())
    }

    /// Resolves `name`.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotReplacedBy`] if the accepted deprecated name does not feed `name`
    /// - [`ResolveError::NoDefault`] if `name` is neither overridden nor declared
    /// - [`ResolveError::Override`] or [`ResolveError::Default`] on a type mismatch
    pub fn get_raw_with(&self, name: &str, lookup: &Lookup) -> Result<SettingValue, ResolveError> {
        self.resolve_raw(name, lookup).map(|entry| entry.value)
    }

    /// Reports where the value of `name` would come from, without warnings.
    ///
    /// # Errors
    ///
    /// As [`Self::source_of_with`].
    pub fn source_of(&self, name: &str) -> Result<ValueSource, ResolveError> {
        self.source_of_with(name, &Lookup::new())
    }

    /// Reports where the value of `name` would come from under `lookup`.
    ///
    /// Nothing is cached and no warnings are emitted.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotReplacedBy`] if the accepted deprecated name does not feed `name`
    /// - [`ResolveError::NoDefault`] if `name` is neither overridden nor declared
    pub fn source_of_with(&self, name: &str, lookup: &Lookup) -> Result<ValueSource, ResolveError> {
        let sources = self.acceptable_sources(name, lookup.accepted_deprecated())?;
        if self.is_overridden(name) {
            return Ok(ValueSource::Override);
        }
        if let Some(record) = sources
            .iter()
            .find(|r| self.is_overridden(r.setting_name()))
        {
            return Ok(ValueSource::DeprecatedOverride(
                record.setting_name().to_string(),
            ));
        }
        self.default_value(name).map(|_| ValueSource::Default)
    }

    /// Returns `true` if the value of `name` currently comes from a
    /// deprecated setting's override.
    ///
    /// # Errors
    ///
    /// As [`Self::is_value_from_deprecated_setting_with`].
    pub fn is_value_from_deprecated_setting(&self, name: &str) -> Result<bool, ResolveError> {
        self.is_value_from_deprecated_setting_with(name, None)
    }

    /// Returns `true` if the value of `name` currently comes from the
    /// override of a deprecated setting (restricted to `accept_deprecated`
    /// when given). An override of `name` itself always wins.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnknownSetting`] if `name` has no default
    /// - [`ResolveError::NotReplacedBy`] if `accept_deprecated` does not feed `name`
    pub fn is_value_from_deprecated_setting_with(
        &self,
        name: &str,
        accept_deprecated: Option<&str>,
    ) -> Result<bool, ResolveError> {
        self.require_known(name)?;
        let sources = self.acceptable_sources(name, accept_deprecated)?;
        if self.is_overridden(name) {
            return Ok(false);
        }
        Ok(sources.iter().any(|r| self.is_overridden(r.setting_name())))
    }

    // --- Typed getters ---

    /// Imports the module named by the string value of `name`.
    ///
    /// # Errors
    ///
    /// As [`Self::get_module_with`].
    pub fn get_module(&self, name: &str) -> Result<Arc<Module>, ResolveError> {
        self.get_module_with(name, &Lookup::new())
    }

    /// Imports the module named by the string value of `name`.
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Self::get_raw_with`], fails with a
    /// [`ValueErrorKind::TypeInvalid`] error for non-string values and a
    /// [`ValueErrorKind::NotImportable`] error when no such module exists.
    pub fn get_module_with(&self, name: &str, lookup: &Lookup) -> Result<Arc<Module>, ResolveError> {
        let key = CacheKey::new(name, lookup.accepted_deprecated());
        if let Some(entry) = self.caches.module(&key) {
            tracing::trace!(setting = name, "Module cache hit");
            self.replay(&entry.warnings, lookup);
            return Ok(entry.value);
        }

        let generation = self.caches.generation();
        let (raw, path) = self.resolve_string(name, lookup)?;
        let module = self.importer.import_module(&path).map_err(|e| {
            self.value_error_from(
                name,
                &raw,
                ValueErrorKind::NotImportable,
                format!(
                    "No module could be found matching the path '{path}'. Please use a full \
                     (not relative) import path in the format: 'project.app.module'."
                ),
                Some(e.into()),
            )
        })?;

        let stored = self.caches.store_module(
            generation,
            key,
            Entry {
                value: Arc::clone(&module),
                warnings: raw.warnings,
            },
        );
        self.note_uncached(stored, name);
        Ok(module)
    }

    /// Imports the object named by the string value of `name`.
    ///
    /// # Errors
    ///
    /// As [`Self::get_object_with`].
    pub fn get_object(&self, name: &str) -> Result<Object, ResolveError> {
        self.get_object_with(name, &Lookup::new())
    }

    /// Imports the object named by the string value of `name`
    /// (`project.app.module.Object`).
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Self::get_raw_with`], fails with a
    /// [`ValueErrorKind::TypeInvalid`] error for non-string values, a
    /// [`ValueErrorKind::FormatInvalid`] error when the value has no module
    /// part, and a [`ValueErrorKind::NotImportable`] error when the module or
    /// object does not exist.
    pub fn get_object_with(&self, name: &str, lookup: &Lookup) -> Result<Object, ResolveError> {
        let key = CacheKey::new(name, lookup.accepted_deprecated());
        if let Some(entry) = self.caches.object(&key) {
            tracing::trace!(setting = name, "Object cache hit");
            self.replay(&entry.warnings, lookup);
            return Ok(entry.value);
        }

        let generation = self.caches.generation();
        let (raw, path) = self.resolve_string(name, lookup)?;
        let Some((module_path, object_name)) = path
            .rsplit_once('.')
            .filter(|(module, object)| !module.is_empty() && !object.is_empty())
        else {
            return Err(self.value_error(
                name,
                &raw,
                ValueErrorKind::FormatInvalid,
                format!(
                    "'{path}' is not a valid object import path. Please use a full (not \
                     relative) import path with the object name at the end, for example: \
                     'project.app.module.object'."
                ),
            ));
        };

        let module = self.importer.import_module(module_path).map_err(|e| {
            self.value_error_from(
                name,
                &raw,
                ValueErrorKind::NotImportable,
                format!(
                    "No module could be found matching the path '{module_path}'. Please use a \
                     full (not relative) import path with the object name at the end, for \
                     example: 'project.app.module.object'."
                ),
                Some(e.into()),
            )
        })?;
        let object = module.attr(object_name).ok_or_else(|| {
            self.value_error(
                name,
                &raw,
                ValueErrorKind::NotImportable,
                format!(
                    "No object could be found in '{module_path}' matching the name \
                     '{object_name}'. Could it have been moved or renamed?"
                ),
            )
        })?;

        let stored = self.caches.store_object(
            generation,
            key,
            Entry {
                value: Arc::clone(&object),
                warnings: raw.warnings,
            },
        );
        self.note_uncached(stored, name);
        Ok(object)
    }

    /// Looks up the model named by the string value of `name`.
    ///
    /// # Errors
    ///
    /// As [`Self::get_model_with`].
    pub fn get_model(&self, name: &str) -> Result<Arc<Model>, ResolveError> {
        self.get_model_with(name, &Lookup::new())
    }

    /// Looks up the model named by the string value of `name` (`app_label.Model`).
    ///
    /// # Errors
    ///
    /// Besides the errors of [`Self::get_raw_with`], fails with a
    /// [`ValueErrorKind::TypeInvalid`] error for non-string values, a
    /// [`ValueErrorKind::FormatInvalid`] error for malformed references, and
    /// a [`ValueErrorKind::NotImportable`] error for unregistered models.
    pub fn get_model_with(&self, name: &str, lookup: &Lookup) -> Result<Arc<Model>, ResolveError> {
        let key = CacheKey::new(name, lookup.accepted_deprecated());
        if let Some(entry) = self.caches.model(&key) {
            tracing::trace!(setting = name, "Model cache hit");
            self.replay(&entry.warnings, lookup);
            return Ok(entry.value);
        }

        let generation = self.caches.generation();
        let (raw, reference) = self.resolve_string(name, lookup)?;
        let model = self.models.get_model(&reference).map_err(|e| {
            let (kind, detail) = match &e {
                ModelLookupError::Malformed { .. } => (
                    ValueErrorKind::FormatInvalid,
                    format!(
                        "Model strings must be in the format 'app_label.Model', which \
                         '{reference}' does not adhere to."
                    ),
                ),
                ModelLookupError::NotRegistered { .. } => (
                    ValueErrorKind::NotImportable,
                    format!("The model '{reference}' does not appear to be installed."),
                ),
            };
            self.value_error_from(name, &raw, kind, detail, Some(e.into()))
        })?;

        let stored = self.caches.store_model(
            generation,
            key,
            Entry {
                value: Arc::clone(&model),
                warnings: raw.warnings,
            },
        );
        self.note_uncached(stored, name);
        Ok(model)
    }

    // --- Internals ---

    pub(crate) fn require_known(&self, name: &str) -> Result<(), ResolveError> {
        if self.in_defaults(name) {
            Ok(())
        } else {
            Err(ResolveError::UnknownSetting {
                setting_name: name.to_string(),
                helper: self.module_path.clone(),
            })
        }
    }

    fn user_value(&self, name: &str) -> Option<SettingValue> {
        self.overrides.get(&self.prefixed_setting_name(name))
    }

    /// Deprecated settings whose overrides may stand in for `name`.
    ///
    /// When several deprecated settings were merged into `name`, none is
    /// picked unless the caller names one.
    fn acceptable_sources(
        &self,
        name: &str,
        accept_deprecated: Option<&str>,
    ) -> Result<Vec<&DeprecatedSetting>, ResolveError> {
        let sources = self.index.sources_for(name);
        let names: &[String] = match accept_deprecated {
            Some(old) => {
                let Some(found) = sources.iter().find(|s| s.as_str() == old) else {
                    return Err(ResolveError::NotReplacedBy {
                        setting_name: name.to_string(),
                        deprecated_name: old.to_string(),
                    });
                };
                std::slice::from_ref(found)
            }
            None if sources.len() == 1 => sources,
            None => &[],
        };
        Ok(names.iter().filter_map(|n| self.index.get(n)).collect())
    }

    fn resolve_raw(&self, name: &str, lookup: &Lookup) -> Result<RawEntry, ResolveError> {
        let sources = self.acceptable_sources(name, lookup.accepted_deprecated())?;
        let key = CacheKey::new(name, lookup.accepted_deprecated());

        if let Some(entry) = self.caches.raw(&key) {
            tracing::trace!(setting = name, "Raw value cache hit");
            self.replay(&entry.warnings, lookup);
            self.check_type(name, &entry, lookup)?;
            return Ok(entry);
        }

        let generation = self.caches.generation();
        let mut warnings = Vec::new();
        if let Some(record) = self.index.get(name) {
            warnings.push(record.attribute_warning());
        }

        let (value, source) = if let Some(value) = self.user_value(name) {
            (value, ValueSource::Override)
        } else if let Some((record, value)) = sources
            .iter()
            .find_map(|r| self.user_value(r.setting_name()).map(|v| (*r, v)))
        {
            warnings.push(record.old_override_warning());
            (
                value,
                ValueSource::DeprecatedOverride(record.setting_name().to_string()),
            )
        } else {
            (self.default_value(name)?.clone(), ValueSource::Default)
        };

        if !lookup.warnings_suppressed() {
            self.emit(&warnings);
        }

        let entry = RawEntry {
            value,
            source,
            warnings,
        };
        tracing::debug!(setting = name, source = %entry.source, "Resolved setting");

        self.check_type(name, &entry, lookup)?;
        let stored = self.caches.store_raw(generation, key, entry.clone());
        self.note_uncached(stored, name);
        Ok(entry)
    }

    /// Resolves `name` as a string for the typed getters.
    fn resolve_string(
        &self,
        name: &str,
        lookup: &Lookup,
    ) -> Result<(RawEntry, String), ResolveError> {
        let lookup = lookup.clone().enforce_type(ValueKind::String);
        let raw = self.resolve_raw(name, &lookup)?;
        match raw.value.as_str() {
            Some(text) => {
                let text = text.to_string();
                Ok((raw, text))
            }
            None => Err(self.value_error(
                name,
                &raw,
                ValueErrorKind::TypeInvalid,
                TypeRequirement::from(ValueKind::String).mismatch_text(raw.value.kind()),
            )),
        }
    }

    fn check_type(&self, name: &str, entry: &RawEntry, lookup: &Lookup) -> Result<(), ResolveError> {
        match lookup.type_requirement() {
            Some(requirement) if !requirement.accepts(&entry.value) => Err(self.value_error(
                name,
                entry,
                ValueErrorKind::TypeInvalid,
                requirement.mismatch_text(entry.value.kind()),
            )),
            _ => Ok(()),
        }
    }

    /// Builds an error blaming whichever side supplied the value.
    fn value_error(
        &self,
        name: &str,
        entry: &RawEntry,
        kind: ValueErrorKind,
        detail: String,
    ) -> ResolveError {
        self.value_error_from(name, entry, kind, detail, None)
    }

    /// As [`Self::value_error`], keeping the collaborator error as the source.
    fn value_error_from(
        &self,
        name: &str,
        entry: &RawEntry,
        kind: ValueErrorKind,
        detail: String,
        source: Option<LookupFailure>,
    ) -> ResolveError {
        let origin = match &entry.source {
            ValueSource::Override => self.override_origin(name),
            ValueSource::DeprecatedOverride(old) => self.override_origin(old),
            ValueSource::Default => format!(
                "There is an issue with the default value specified for {name} in {}.",
                self.defaults_path
            ),
        };
        let error = ValueError {
            kind,
            setting_name: name.to_string(),
            value: entry.value.clone(),
            message: format!("{origin} {detail}"),
            source,
        };
        if entry.source.is_override() {
            ResolveError::Override(error)
        } else {
            ResolveError::Default(error)
        }
    }

    fn override_origin(&self, name: &str) -> String {
        format!(
            "There is an issue with the value specified for {} in your project's settings.",
            self.prefixed_setting_name(name)
        )
    }

    /// Logs a result that was not cached because the caches were cleared
    /// while it was being resolved.
    fn note_uncached(&self, stored: bool, name: &str) {
        if !stored {
            tracing::debug!(
                module = %self.module_path,
                setting = name,
                "Overrides changed during resolution, result not cached"
            );
        }
    }

    fn emit(&self, warnings: &[DeprecationWarning]) {
        for warning in warnings {
            self.warnings.emit(warning.clone());
        }
    }

    /// Re-emits stored warnings on a cache hit, if the policy asks for it.
    fn replay(&self, warnings: &[DeprecationWarning], lookup: &Lookup) {
        if self.policy == WarningPolicy::EveryResolution && !lookup.warnings_suppressed() {
            self.emit(warnings);
        }
    }
}
