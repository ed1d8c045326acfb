//! Shared test fixtures for resolver tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ResolverBuilder, SettingsResolver, WarningPolicy};
use crate::deprecation::{DeprecatedSetting, WarningCategory, WarningLog};
use crate::source::{
    DefaultsTable, ImportError, Importer, MemoryOverrides, Model, ModelLookupError, ModelRegistry,
    ModelTable, Module, ModuleTable, StaticDefaults,
};
use crate::value::SettingValue;

pub const MODULE_PATH: &str = "tests.conf.settings";
pub const DEFAULTS_PATH: &str = "tests.conf.defaults";

#[derive(Debug, PartialEq, Eq)]
pub struct DefaultClass;

#[derive(Debug, PartialEq, Eq)]
pub struct CustomClass;

/// Importer that counts how often it is asked for a module.
pub struct CountingImporter {
    table: ModuleTable,
    calls: AtomicUsize,
}

impl CountingImporter {
    pub fn new(table: ModuleTable) -> Self {
        Self {
            table,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Importer for CountingImporter {
    fn import_module(&self, path: &str) -> Result<Arc<Module>, ImportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.import_module(path)
    }
}

/// Model registry that counts lookups.
pub struct CountingModels {
    table: ModelTable,
    calls: AtomicUsize,
}

impl CountingModels {
    pub fn new(table: ModelTable) -> Self {
        Self {
            table,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ModelRegistry for CountingModels {
    fn get_model(&self, reference: &str) -> Result<Arc<Model>, ModelLookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.table.get_model(reference)
    }
}

pub fn sample_modules() -> ModuleTable {
    ModuleTable::new()
        .with(Module::new("tests.modules.default_module").with_attr("DefaultClass", DefaultClass))
        .with(Module::new("tests.modules.custom_module").with_attr("CustomClass", CustomClass))
}

pub fn sample_models() -> ModelTable {
    ModelTable::new()
        .with(Model::new("tests", "DefaultModel"))
        .with(Model::new("tests", "CustomModel"))
}

pub fn sample_defaults() -> DefaultsTable {
    DefaultsTable::from_bindings([
        ("MODULE_SETTING", SettingValue::from("tests.modules.default_module")),
        (
            "OBJECT_SETTING",
            SettingValue::from("tests.modules.default_module.DefaultClass"),
        ),
        ("MODEL_SETTING", SettingValue::from("tests.DefaultModel")),
        ("INTEGER_SETTING", SettingValue::from(1234)),
        ("STRING_SETTING", SettingValue::from("abc")),
        ("BOOLEAN_SETTING", SettingValue::from(true)),
        ("DEPRECATED_SETTING", SettingValue::from("old")),
        ("REPLACEMENT_SETTING", SettingValue::from("new")),
        ("REMOVED_SETTING", SettingValue::from(1)),
        ("MERGED_SETTING", SettingValue::from("merged")),
        ("SOURCE_A", SettingValue::from("a")),
        ("SOURCE_B", SettingValue::from("b")),
        ("SOURCE_C", SettingValue::from("c")),
        ("helper_function", SettingValue::from("ignored")),
    ])
}

pub fn sample_loader() -> StaticDefaults {
    StaticDefaults::new().with(DEFAULTS_PATH, sample_defaults())
}

pub fn sample_deprecations() -> Vec<DeprecatedSetting> {
    vec![
        DeprecatedSetting::new("DEPRECATED_SETTING").renamed_to("REPLACEMENT_SETTING"),
        DeprecatedSetting::new("REMOVED_SETTING").category(WarningCategory::Pending),
        DeprecatedSetting::new("SOURCE_A").replaced_by("MERGED_SETTING"),
        DeprecatedSetting::new("SOURCE_B").replaced_by("MERGED_SETTING"),
        DeprecatedSetting::new("SOURCE_C").replaced_by("MERGED_SETTING"),
    ]
}

/// A resolver over the sample tables plus handles to its collaborators.
pub struct Harness {
    pub resolver: SettingsResolver,
    pub overrides: Arc<MemoryOverrides>,
    pub warnings: Arc<WarningLog>,
    pub importer: Arc<CountingImporter>,
    pub models: Arc<CountingModels>,
}

impl Harness {
    pub fn new(overrides: MemoryOverrides) -> Self {
        Self::with_policy(overrides, WarningPolicy::FirstResolution)
    }

    pub fn with_policy(overrides: MemoryOverrides, policy: WarningPolicy) -> Self {
        let overrides = Arc::new(overrides);
        let warnings = Arc::new(WarningLog::new());
        let importer = Arc::new(CountingImporter::new(sample_modules()));
        let models = Arc::new(CountingModels::new(sample_models()));

        let resolver = ResolverBuilder::new(MODULE_PATH)
            .defaults_loader(sample_loader())
            .deprecations(sample_deprecations())
            .overrides(Arc::clone(&overrides))
            .warnings(Arc::clone(&warnings))
            .importer(Arc::clone(&importer))
            .models(Arc::clone(&models))
            .warning_policy(policy)
            .build()
            .unwrap();

        Self {
            resolver,
            overrides,
            warnings,
            importer,
            models,
        }
    }
}
