//! Default value tables and the loaders that produce them.

use std::collections::{BTreeMap, HashMap};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::error::DefaultsError;
use super::importer::is_dotted_path;
use crate::value::SettingValue;

/// Returns `true` if `name` looks like a setting name.
///
/// A setting name contains at least one letter and no lower-case letters,
/// so `TIMEOUT`, `RETRY_2` and `_PRIVATE_X` qualify while `timeout`,
/// `Timeout` and `_42` do not.
#[must_use]
pub fn is_setting_name(name: &str) -> bool {
    let mut has_cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// The default values declared by a component.
///
/// Only bindings whose names pass [`is_setting_name`] are kept; anything
/// else in the source (helpers, metadata sections) is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefaultsTable {
    values: BTreeMap<String, SettingValue>,
}

impl DefaultsTable {
    /// Builds a table from arbitrary bindings, keeping setting names only.
    #[must_use]
    pub fn from_bindings<K, V>(bindings: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<SettingValue>,
    {
        let values = bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| is_setting_name(k))
            .collect();
        Self { values }
    }

    /// Parses a TOML document; top-level keys are the bindings.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the document is invalid.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let raw: BTreeMap<String, toml::Value> = toml::from_str(content)?;
        let values = raw
            .into_iter()
            .filter(|(name, _)| is_setting_name(name))
            .map(|(name, value)| (name, SettingValue::from(value)))
            .collect();
        Ok(Self { values })
    }

    /// Returns the default for `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SettingValue> {
        self.values.get(name)
    }

    /// Returns `true` if a default is declared for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over setting names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of declared settings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no settings are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Loads the defaults table named by a dotted path.
pub trait DefaultsLoader: Send + Sync {
    /// Loads the table for `path` (e.g. `myapp.conf.defaults`).
    ///
    /// # Errors
    ///
    /// Returns [`DefaultsError`] if the path is malformed or nothing can be
    /// loaded from it.
    fn load(&self, path: &str) -> Result<DefaultsTable, DefaultsError>;
}

impl<T: DefaultsLoader + ?Sized> DefaultsLoader for std::sync::Arc<T> {
    fn load(&self, path: &str) -> Result<DefaultsTable, DefaultsError> {
        (**self).load(path)
    }
}

/// In-memory catalogue of defaults tables keyed by dotted path.
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    tables: HashMap<String, DefaultsTable>,
}

impl StaticDefaults {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `table` under `path`.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, table: DefaultsTable) -> Self {
        self.tables.insert(path.into(), table);
        self
    }
}

impl DefaultsLoader for StaticDefaults {
    fn load(&self, path: &str) -> Result<DefaultsTable, DefaultsError> {
        self.tables
            .get(path)
            .cloned()
            .ok_or_else(|| DefaultsError::InvalidPath {
                path: path.to_string(),
            })
    }
}

/// Loads defaults from TOML files under a root directory.
///
/// The dotted path `myapp.conf.defaults` maps to
/// `<root>/myapp/conf/defaults.toml`.
#[derive(Debug, Clone)]
pub struct TomlDefaultsLoader {
    root: PathBuf,
}

impl TomlDefaultsLoader {
    /// Creates a loader resolving paths under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a dotted path to the file it would be loaded from.
    #[must_use]
    pub fn file_for(&self, path: &str) -> PathBuf {
        let mut file = self.root.clone();
        file.extend(path.split('.'));
        file.set_extension("toml");
        file
    }
}

impl Default for TomlDefaultsLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl DefaultsLoader for TomlDefaultsLoader {
    fn load(&self, path: &str) -> Result<DefaultsTable, DefaultsError> {
        if !is_dotted_path(path) {
            return Err(DefaultsError::InvalidPath {
                path: path.to_string(),
            });
        }

        let file = self.file_for(path);
        let content = match std::fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DefaultsError::InvalidPath {
                    path: path.to_string(),
                });
            }
            Err(source) => return Err(DefaultsError::Read { file, source }),
        };

        tracing::debug!("Loading defaults for {path} from {}", file.display());
        DefaultsTable::from_toml_str(&content).map_err(|source| DefaultsError::Parse { file, source })
    }
}
