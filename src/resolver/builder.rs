//! Resolver construction.

use std::sync::Arc;

use super::cache::Caches;
use super::engine::SettingsResolver;
use super::error::DefinitionError;
use super::index::{DeprecationIndex, IndexContext};
use crate::deprecation::{DeprecatedSetting, TracingSink, WarningSink};
use crate::source::{
    DefaultsLoader, EnvOverrides, Importer, ModelRegistry, ModelTable, ModuleTable,
    OverrideStore, TomlDefaultsLoader, is_dotted_path,
};

/// Static description of a component's settings.
///
/// Implement this on a marker type to give a settings definition its
/// class-level prefix, defaults path and deprecations, then build a resolver
/// with [`ResolverBuilder::for_app`]. Values set on the builder win over
/// the ones declared here.
///
/// # Examples
///
/// ```
/// use app_settings::deprecation::DeprecatedSetting;
/// use app_settings::resolver::AppSettings;
///
/// struct PollSettings;
///
/// impl AppSettings for PollSettings {
///     const MODULE_PATH: &'static str = "polls.conf.settings";
///     const PREFIX: Option<&'static str> = Some("POLLS");
///
///     fn deprecations() -> Vec<DeprecatedSetting> {
///         vec![DeprecatedSetting::new("MAX_CHOICES").renamed_to("CHOICE_LIMIT")]
///     }
/// }
/// ```
pub trait AppSettings {
    /// Dotted (or `::`-separated) path of the module defining the settings.
    const MODULE_PATH: &'static str;

    /// Prefix for override names; derived from [`Self::MODULE_PATH`] when `None`.
    const PREFIX: Option<&'static str> = None;

    /// Dotted path of the defaults table; derived from [`Self::MODULE_PATH`] when `None`.
    const DEFAULTS_PATH: Option<&'static str> = None;

    /// Deprecated settings.
    #[must_use]
    fn deprecations() -> Vec<DeprecatedSetting> {
        Vec::new()
    }
}

/// When deprecation warnings are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarningPolicy {
    /// Only when a value is resolved from scratch; cache hits are silent.
    #[default]
    FirstResolution,
    /// On every lookup, including cache hits.
    EveryResolution,
}

/// Accepts both `a.b.c` and `a::b::c`.
fn normalize_module_path(path: &str) -> String {
    path.replace("::", ".")
}

fn parent_segments(module_path: &str) -> Result<Vec<&str>, DefinitionError> {
    if !is_dotted_path(module_path) {
        return Err(DefinitionError::InvalidModulePath(module_path.to_string()));
    }
    let mut segments: Vec<&str> = module_path.split('.').collect();
    segments.pop();
    Ok(segments)
}

/// Derives an override prefix from a module path.
///
/// The module's own segment and a trailing `conf` package are dropped and the
/// rest is upper-cased and joined with `_`, so `polls.conf.settings` gives
/// `POLLS` and a top-level `settings` module gives an empty prefix.
///
/// # Errors
///
/// Returns [`DefinitionError::InvalidModulePath`] for malformed paths.
pub fn derive_prefix(module_path: &str) -> Result<String, DefinitionError> {
    let normalized = normalize_module_path(module_path);
    let mut segments = parent_segments(&normalized)?;
    if segments.last() == Some(&"conf") {
        segments.pop();
    }
    Ok(segments
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("_"))
}

/// Derives the defaults path (a `defaults` sibling of the settings module).
///
/// # Errors
///
/// Returns [`DefinitionError::InvalidModulePath`] for malformed paths.
pub fn derive_defaults_path(module_path: &str) -> Result<String, DefinitionError> {
    let normalized = normalize_module_path(module_path);
    let segments = parent_segments(&normalized)?;
    if segments.is_empty() {
        Ok("defaults".to_string())
    } else {
        Ok(format!("{}.defaults", segments.join(".")))
    }
}

/// Builder for [`SettingsResolver`].
///
/// Collaborators default to process-level implementations: defaults are read
/// from TOML files under the working directory, overrides from environment
/// variables, and warnings go to `tracing`. The importer and model registry
/// default to empty tables.
///
/// # Examples
///
/// ```
/// use app_settings::resolver::ResolverBuilder;
/// use app_settings::source::{DefaultsTable, MemoryOverrides, StaticDefaults};
///
/// let defaults = StaticDefaults::new()
///     .with("polls.conf.defaults", DefaultsTable::from_bindings([("TIMEOUT", 30)]));
///
/// let resolver = ResolverBuilder::new("polls.conf.settings")
///     .defaults_loader(defaults)
///     .overrides(MemoryOverrides::new().with("POLLS_TIMEOUT", 5))
///     .build()
///     .unwrap();
///
/// assert_eq!(resolver.prefix(), "POLLS");
/// assert_eq!(resolver.get("TIMEOUT").unwrap().as_integer(), Some(5));
/// ```
pub struct ResolverBuilder {
    module_path: String,
    class_prefix: Option<String>,
    class_defaults_path: Option<String>,
    class_deprecations: Vec<DeprecatedSetting>,
    prefix: Option<String>,
    defaults_path: Option<String>,
    deprecations: Option<Vec<DeprecatedSetting>>,
    loader: Arc<dyn DefaultsLoader>,
    overrides: Arc<dyn OverrideStore>,
    importer: Arc<dyn Importer>,
    models: Arc<dyn ModelRegistry>,
    warnings: Arc<dyn WarningSink>,
    warning_policy: WarningPolicy,
}

impl std::fmt::Debug for ResolverBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverBuilder")
            .field("module_path", &self.module_path)
            .field("prefix", &self.prefix.as_ref().or(self.class_prefix.as_ref()))
            .field(
                "defaults_path",
                &self.defaults_path.as_ref().or(self.class_defaults_path.as_ref()),
            )
            .field("warning_policy", &self.warning_policy)
            .finish_non_exhaustive()
    }
}

impl ResolverBuilder {
    /// Starts a resolver for the settings module at `module_path`.
    #[must_use]
    pub fn new(module_path: impl Into<String>) -> Self {
        Self {
            module_path: normalize_module_path(&module_path.into()),
            class_prefix: None,
            class_defaults_path: None,
            class_deprecations: Vec::new(),
            prefix: None,
            defaults_path: None,
            deprecations: None,
            loader: Arc::new(TomlDefaultsLoader::default()),
            overrides: Arc::new(EnvOverrides::new()),
            importer: Arc::new(ModuleTable::new()),
            models: Arc::new(ModelTable::new()),
            warnings: Arc::new(TracingSink),
            warning_policy: WarningPolicy::default(),
        }
    }

    /// Starts a resolver from a static settings definition.
    #[must_use]
    pub fn for_app<A: AppSettings>() -> Self {
        let mut builder = Self::new(A::MODULE_PATH);
        builder.class_prefix = A::PREFIX.map(str::to_string);
        builder.class_defaults_path = A::DEFAULTS_PATH.map(str::to_string);
        builder.class_deprecations = A::deprecations();
        builder
    }

    /// Sets the override prefix. A trailing `_` is ignored.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the dotted path of the defaults table.
    #[must_use]
    pub fn defaults_path(mut self, path: impl Into<String>) -> Self {
        self.defaults_path = Some(path.into());
        self
    }

    /// Replaces the deprecated settings.
    #[must_use]
    pub fn deprecations(mut self, records: impl IntoIterator<Item = DeprecatedSetting>) -> Self {
        self.deprecations = Some(records.into_iter().collect());
        self
    }

    /// Sets where defaults tables are loaded from.
    #[must_use]
    pub fn defaults_loader(mut self, loader: impl DefaultsLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Sets the host application's override store.
    #[must_use]
    pub fn overrides(mut self, store: impl OverrideStore + 'static) -> Self {
        self.overrides = Arc::new(store);
        self
    }

    /// Sets the module importer.
    #[must_use]
    pub fn importer(mut self, importer: impl Importer + 'static) -> Self {
        self.importer = Arc::new(importer);
        self
    }

    /// Sets the model registry.
    #[must_use]
    pub fn models(mut self, registry: impl ModelRegistry + 'static) -> Self {
        self.models = Arc::new(registry);
        self
    }

    /// Sets where deprecation warnings go.
    #[must_use]
    pub fn warnings(mut self, sink: impl WarningSink + 'static) -> Self {
        self.warnings = Arc::new(sink);
        self
    }

    /// Sets when deprecation warnings are emitted.
    #[must_use]
    pub const fn warning_policy(mut self, policy: WarningPolicy) -> Self {
        self.warning_policy = policy;
        self
    }

    /// Loads defaults, validates deprecations and subscribes to override changes.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError`] if the defaults cannot be loaded or a
    /// deprecation definition is invalid.
    pub fn build(self) -> Result<SettingsResolver, DefinitionError> {
        let prefix = match self.prefix.or(self.class_prefix) {
            Some(explicit) => explicit.trim_end_matches('_').to_string(),
            None => derive_prefix(&self.module_path)?,
        };
        let defaults_path = match self.defaults_path.or(self.class_defaults_path) {
            Some(explicit) => explicit,
            None => derive_defaults_path(&self.module_path)?,
        };

        let defaults =
            self.loader
                .load(&defaults_path)
                .map_err(|source| DefinitionError::Defaults {
                    helper: self.module_path.clone(),
                    path: defaults_path.clone(),
                    source,
                })?;

        let records = self.deprecations.unwrap_or(self.class_deprecations);
        let index = DeprecationIndex::build(
            records,
            &IndexContext {
                helper: &self.module_path,
                prefix: &prefix,
                defaults_path: &defaults_path,
                defaults: &defaults,
            },
        )?;

        let caches = Arc::new(Caches::default());
        let weak = Arc::downgrade(&caches);
        let subscription = self.overrides.subscribe(Arc::new(move || {
            if let Some(caches) = weak.upgrade() {
                caches.clear();
                tracing::debug!("Override store changed, caches cleared");
            }
        }));

        tracing::debug!(
            module = %self.module_path,
            prefix = %prefix,
            defaults_path = %defaults_path,
            settings = defaults.len(),
            deprecations = index.len(),
            "Settings resolver ready"
        );

        Ok(SettingsResolver {
            module_path: self.module_path,
            prefix,
            defaults_path,
            defaults,
            index,
            overrides: self.overrides,
            importer: self.importer,
            models: self.models,
            warnings: self.warnings,
            policy: self.warning_policy,
            caches,
            subscription,
        })
    }
}
