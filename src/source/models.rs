//! Data-model registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::ModelLookupError;

/// A registered data model, identified by `app_label.Name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Model {
    app_label: String,
    name: String,
}

impl Model {
    /// Creates a model description.
    #[must_use]
    pub fn new(app_label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
        }
    }

    /// The owning application's label.
    #[must_use]
    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    /// The model name, as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `app_label.Name` reference for this model.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.name)
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.name)
    }
}

/// Looks up data models by `app_label.Name` reference.
pub trait ModelRegistry: Send + Sync {
    /// Returns the model named by `reference`.
    ///
    /// # Errors
    ///
    /// - [`ModelLookupError::Malformed`] if `reference` is not `app_label.Name`
    /// - [`ModelLookupError::NotRegistered`] if no such model exists
    fn get_model(&self, reference: &str) -> Result<Arc<Model>, ModelLookupError>;
}

impl<T: ModelRegistry + ?Sized> ModelRegistry for Arc<T> {
    fn get_model(&self, reference: &str) -> Result<Arc<Model>, ModelLookupError> {
        (**self).get_model(reference)
    }
}

/// In-memory model registry.
///
/// App labels match exactly; model names match case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ModelTable {
    models: HashMap<(String, String), Arc<Model>>,
}

impl ModelTable {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model`.
    #[must_use]
    pub fn with(mut self, model: Model) -> Self {
        self.register(model);
        self
    }

    /// Registers `model`, replacing any model with the same label.
    pub fn register(&mut self, model: Model) {
        let key = (model.app_label.clone(), model.name.to_lowercase());
        self.models.insert(key, Arc::new(model));
    }
}

/// Splits `app_label.Name` into its two parts.
fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let (app_label, name) = reference.split_once('.')?;
    if app_label.is_empty() || name.is_empty() || name.contains('.') {
        return None;
    }
    Some((app_label, name))
}

impl ModelRegistry for ModelTable {
    fn get_model(&self, reference: &str) -> Result<Arc<Model>, ModelLookupError> {
        let (app_label, name) =
            split_reference(reference).ok_or_else(|| ModelLookupError::Malformed {
                reference: reference.to_string(),
            })?;

        self.models
            .get(&(app_label.to_string(), name.to_lowercase()))
            .cloned()
            .ok_or_else(|| ModelLookupError::NotRegistered {
                reference: reference.to_string(),
            })
    }
}
