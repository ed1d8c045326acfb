//! Human and JSON renderings of resolved settings.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use super::ManifestError;
use crate::resolver::{Lookup, ResolveError, SettingsResolver};
use crate::value::SettingValue;

/// One resolved setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingReport {
    /// Setting name (unprefixed)
    pub name: String,
    /// Name the override store uses
    pub prefixed_name: String,
    /// Resolved value
    pub value: SettingValue,
    /// Where the value came from
    pub source: String,
    /// Whether the setting itself is deprecated
    pub deprecated: bool,
    /// Replacement for a deprecated setting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

impl SettingReport {
    /// Resolves `name` and describes the result.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error if `name` cannot be resolved.
    pub fn resolve(
        resolver: &SettingsResolver,
        name: &str,
        lookup: &Lookup,
    ) -> Result<Self, ResolveError> {
        let value = resolver.get_raw_with(name, lookup)?;
        let source = resolver.source_of_with(name, lookup)?;
        let record = resolver.deprecation(name);

        Ok(Self {
            name: name.to_string(),
            prefixed_name: resolver.prefixed_setting_name(name),
            value,
            source: source.to_string(),
            deprecated: record.is_some(),
            replacement: record
                .and_then(|r| r.replacement_name())
                .map(str::to_string),
        })
    }
}

impl fmt::Display for SettingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} [{}]", self.name, self.value, self.source)?;
        match (&self.replacement, self.deprecated) {
            (Some(new), _) => write!(f, " (deprecated, use {new})"),
            (None, true) => write!(f, " (deprecated)"),
            (None, false) => Ok(()),
        }
    }
}

/// Compiles the `--filter` pattern.
///
/// # Errors
///
/// Returns [`ManifestError::InvalidRegex`] for invalid patterns.
pub fn compile_filter(pattern: Option<&str>) -> Result<Option<Regex>, ManifestError> {
    pattern
        .map(|p| {
            Regex::new(p).map_err(|source| ManifestError::InvalidRegex {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()
}

/// Resolves every declared setting matching `filter`, in name order.
///
/// Deprecation warnings are suppressed; the reports flag deprecated settings
/// instead.
///
/// # Errors
///
/// Returns the first resolution error.
pub fn report_all(
    resolver: &SettingsResolver,
    filter: Option<&Regex>,
) -> Result<Vec<SettingReport>, ResolveError> {
    let lookup = Lookup::new().suppress_warnings();
    resolver
        .setting_names()
        .filter(|name| filter.is_none_or(|re| re.is_match(name)))
        .map(|name| SettingReport::resolve(resolver, name, &lookup))
        .collect()
}

/// Result of validating a settings definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Module path of the definition
    pub module: String,
    /// Number of declared settings
    pub settings: usize,
    /// Number of deprecated settings
    pub deprecations: usize,
    /// Prefixed names of deprecated settings the host application still overrides
    pub deprecated_overrides: Vec<String>,
}

impl CheckSummary {
    /// Resolves every setting and collects overrides of deprecated names.
    ///
    /// # Errors
    ///
    /// Returns the first resolution error.
    pub fn run(resolver: &SettingsResolver) -> Result<Self, ResolveError> {
        let settings = report_all(resolver, None)?.len();
        let deprecated_overrides = resolver
            .deprecations()
            .map(|r| r.setting_name())
            .filter(|name| resolver.is_overridden(name))
            .map(|name| resolver.prefixed_setting_name(name))
            .collect();

        Ok(Self {
            module: resolver.module_path().to_string(),
            settings,
            deprecations: resolver.deprecations().count(),
            deprecated_overrides,
        })
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} setting(s), {} deprecation(s) OK",
            self.module, self.settings, self.deprecations
        )?;
        for name in &self.deprecated_overrides {
            write!(f, "\nwarning: {name} is deprecated but still overridden")?;
        }
        Ok(())
    }
}
