//! Override stores: where the host application supplies its own values.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use super::error::OverridesError;
use super::notify::{ChangeNotifier, Listener, Subscription};
use crate::value::SettingValue;

/// The host application's settings namespace.
///
/// Names passed in are already prefixed (`MYAPP_TIMEOUT`).
pub trait OverrideStore: Send + Sync {
    /// Returns the value stored under `name`, if any.
    fn get(&self, name: &str) -> Option<SettingValue>;

    /// Returns `true` if a value is stored under `name`.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registers `listener` to be called whenever the store changes.
    ///
    /// Stores that never change return a detached handle.
    fn subscribe(&self, listener: Listener) -> Subscription {
        drop(listener);
        Subscription::detached()
    }
}

impl<T: OverrideStore + ?Sized> OverrideStore for std::sync::Arc<T> {
    fn get(&self, name: &str) -> Option<SettingValue> {
        (**self).get(name)
    }

    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        (**self).subscribe(listener)
    }
}

/// Mutable, in-memory override store.
///
/// Every mutation notifies subscribers, so resolvers reading from this
/// store drop their caches automatically.
///
/// # Examples
///
/// ```
/// use app_settings::source::{MemoryOverrides, OverrideStore};
///
/// let store = MemoryOverrides::new().with("MYAPP_TIMEOUT", 30);
/// assert!(store.contains("MYAPP_TIMEOUT"));
///
/// store.remove("MYAPP_TIMEOUT");
/// assert!(!store.contains("MYAPP_TIMEOUT"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryOverrides {
    values: RwLock<HashMap<String, SettingValue>>,
    notifier: ChangeNotifier,
}

impl MemoryOverrides {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value while building the store (no notification).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.values
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    /// Parses a TOML document; top-level keys are the override names.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self, OverridesError> {
        let raw: HashMap<String, toml::Value> = toml::from_str(content)?;
        let values = raw
            .into_iter()
            .map(|(name, value)| (name, SettingValue::from(value)))
            .collect();
        Ok(Self {
            values: RwLock::new(values),
            notifier: ChangeNotifier::new(),
        })
    }

    /// Loads overrides from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, OverridesError> {
        let content = std::fs::read_to_string(path).map_err(|e| OverridesError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_toml_str(&content)
    }

    /// Stores `value` under `name` and notifies subscribers.
    pub fn set(&self, name: impl Into<String>, value: impl Into<SettingValue>) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self.notifier.notify();
    }

    /// Removes `name` and notifies subscribers. Returns the removed value.
    pub fn remove(&self, name: &str) -> Option<SettingValue> {
        let removed = self
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        self.notifier.notify();
        removed
    }

    /// Replaces every stored value at once and notifies subscribers.
    pub fn replace_all(&self, values: impl IntoIterator<Item = (String, SettingValue)>) {
        *self.values.write().unwrap_or_else(PoisonError::into_inner) =
            values.into_iter().collect();
        self.notifier.notify();
    }

    /// Number of stored overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is overridden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The notifier announcing changes to this store.
    #[must_use]
    pub const fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }
}

impl OverrideStore for MemoryOverrides {
    fn get(&self, name: &str) -> Option<SettingValue> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.notifier.subscribe(listener)
    }
}

/// Reads overrides from process environment variables.
///
/// Values are parsed as TOML literals (`30`, `true`, `"text"`), falling back
/// to plain strings, so `MYAPP_TIMEOUT=30` yields an integer and
/// `MYAPP_BACKEND=project.backends.Redis` yields a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvOverrides;

impl EnvOverrides {
    /// Creates an environment-backed store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl OverrideStore for EnvOverrides {
    fn get(&self, name: &str) -> Option<SettingValue> {
        std::env::var(name)
            .ok()
            .map(|raw| SettingValue::parse_literal(&raw))
    }
}
