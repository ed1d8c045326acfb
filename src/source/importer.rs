//! Dotted-path module imports.
//!
//! Settings such as `"project.app.handlers"` name a module, and settings
//! such as `"project.app.handlers.Handler"` name an object inside one. An
//! [`Importer`] turns such paths into [`Module`]s; object lookups are plain
//! attribute reads on the imported module.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::error::ImportError;

/// Any object a module can expose.
pub type Object = Arc<dyn Any + Send + Sync>;

/// Returns `true` if `path` is a well-formed absolute dotted path.
///
/// Each segment must start with a letter or underscore and continue with
/// letters, digits or underscores. Relative paths (leading dot) and empty
/// segments are rejected.
#[must_use]
pub fn is_dotted_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// An importable unit exposing named objects.
#[derive(Clone)]
pub struct Module {
    path: String,
    attributes: BTreeMap<String, Object>,
}

impl Module {
    /// Creates an empty module at `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attr<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.attributes.insert(name.into(), Arc::new(value));
        self
    }

    /// Adds an already shared attribute.
    #[must_use]
    pub fn with_object(mut self, name: impl Into<String>, object: Object) -> Self {
        self.attributes.insert(name.into(), object);
        self
    }

    /// The module's dotted path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the attribute called `name`, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<Object> {
        self.attributes.get(name).cloned()
    }

    /// Iterates over attribute names in sorted order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("path", &self.path)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolves dotted paths to modules.
pub trait Importer: Send + Sync {
    /// Imports the module at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] if the path is malformed or names no module.
    fn import_module(&self, path: &str) -> Result<Arc<Module>, ImportError>;
}

impl<T: Importer + ?Sized> Importer for Arc<T> {
    fn import_module(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        (**self).import_module(path)
    }
}

/// In-memory module registry.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: HashMap<String, Arc<Module>>,
}

impl ModuleTable {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `module` under its own path.
    #[must_use]
    pub fn with(mut self, module: Module) -> Self {
        self.register(module);
        self
    }

    /// Registers `module` under its own path, replacing any previous one.
    pub fn register(&mut self, module: Module) {
        self.modules.insert(module.path.clone(), Arc::new(module));
    }

    /// Number of registered modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Importer for ModuleTable {
    fn import_module(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        if !is_dotted_path(path) {
            return Err(ImportError::InvalidPath {
                path: path.to_string(),
            });
        }
        self.modules
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::NotFound {
                path: path.to_string(),
            })
    }
}
