//! Shortcut views that resolve declared settings through one typed getter.

use std::sync::Arc;

use super::engine::SettingsResolver;
use super::error::ResolveError;
use crate::source::{Model, Module, Object};

/// Resolves declared settings as modules. See [`SettingsResolver::modules`].
#[derive(Debug, Clone, Copy)]
pub struct Modules<'a> {
    resolver: &'a SettingsResolver,
}

impl Modules<'_> {
    /// Imports the module named by setting `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownSetting`] for undeclared names,
    /// otherwise as [`SettingsResolver::get_module`].
    pub fn get(&self, name: &str) -> Result<Arc<Module>, ResolveError> {
        self.resolver.require_known(name)?;
        self.resolver.get_module(name)
    }
}

/// Resolves declared settings as objects. See [`SettingsResolver::objects`].
#[derive(Debug, Clone, Copy)]
pub struct Objects<'a> {
    resolver: &'a SettingsResolver,
}

impl Objects<'_> {
    /// Imports the object named by setting `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownSetting`] for undeclared names,
    /// otherwise as [`SettingsResolver::get_object`].
    pub fn get(&self, name: &str) -> Result<Object, ResolveError> {
        self.resolver.require_known(name)?;
        self.resolver.get_object(name)
    }
}

/// Resolves declared settings as models. See [`SettingsResolver::models`].
#[derive(Debug, Clone, Copy)]
pub struct Models<'a> {
    resolver: &'a SettingsResolver,
}

impl Models<'_> {
    /// Looks up the model named by setting `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownSetting`] for undeclared names,
    /// otherwise as [`SettingsResolver::get_model`].
    pub fn get(&self, name: &str) -> Result<Arc<Model>, ResolveError> {
        self.resolver.require_known(name)?;
        self.resolver.get_model(name)
    }
}

impl SettingsResolver {
    /// Module view: `resolver.modules().get("BACKEND")`.
    #[must_use]
    pub const fn modules(&self) -> Modules<'_> {
        Modules { resolver: self }
    }

    /// Object view: `resolver.objects().get("FORM_CLASS")`.
    #[must_use]
    pub const fn objects(&self) -> Objects<'_> {
        Objects { resolver: self }
    }

    /// Model view: `resolver.models().get("PAGE_MODEL")`.
    #[must_use]
    pub const fn models(&self) -> Models<'_> {
        Models { resolver: self }
    }
}
