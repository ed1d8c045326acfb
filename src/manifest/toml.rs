//! TOML manifest parsing.
//!
//! A manifest describes one settings definition: where its module lives,
//! how overrides are prefixed, and which settings are deprecated.

use std::path::Path;

use serde::Deserialize;

use super::ManifestError;
use crate::deprecation::{DeprecatedSetting, WarningCategory};
use crate::resolver::ResolverBuilder;

/// Module path used when neither the CLI nor the manifest names one.
pub const DEFAULT_MODULE: &str = "settings";

/// Root structure of a manifest file.
///
/// All fields are optional; anything left out is derived from the module
/// path the same way a [`ResolverBuilder`] derives it.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Dotted path of the settings module
    pub module: Option<String>,

    /// Override prefix
    pub prefix: Option<String>,

    /// Dotted path of the defaults table
    pub defaults_path: Option<String>,

    /// Deprecated settings
    #[serde(default)]
    pub deprecations: Vec<DeprecationEntry>,
}

/// One `[[deprecations]]` entry.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeprecationEntry {
    /// The deprecated setting name
    pub setting: String,

    /// Drop-in replacement name
    pub renamed_to: Option<String>,

    /// Non drop-in replacement name
    pub replaced_by: Option<String>,

    /// "deprecated" (removed next version) or "pending" (two versions time)
    #[serde(default)]
    pub category: WarningCategory,

    /// Extra text appended to every warning
    pub guidance: Option<String>,
}

impl From<DeprecationEntry> for DeprecatedSetting {
    fn from(entry: DeprecationEntry) -> Self {
        let mut record = Self::new(entry.setting).category(entry.category);
        if let Some(new) = entry.renamed_to {
            record = record.renamed_to(new);
        }
        if let Some(new) = entry.replaced_by {
            record = record.replaced_by(new);
        }
        if let Some(text) = entry.guidance {
            record = record.guidance(text);
        }
        record
    }
}

impl Manifest {
    /// Loads a manifest from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| ManifestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses a manifest from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown fields.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(ManifestError::from)
    }

    /// Starts a resolver builder from this manifest.
    ///
    /// `module` (from the CLI) wins over the manifest's own module path.
    #[must_use]
    pub fn into_builder(self, module: Option<&str>) -> ResolverBuilder {
        let module_path = module
            .map(str::to_string)
            .or(self.module)
            .unwrap_or_else(|| DEFAULT_MODULE.to_string());

        let mut builder = ResolverBuilder::new(module_path)
            .deprecations(self.deprecations.into_iter().map(DeprecatedSetting::from));
        if let Some(prefix) = self.prefix {
            builder = builder.prefix(prefix);
        }
        if let Some(path) = self.defaults_path {
            builder = builder.defaults_path(path);
        }
        builder
    }
}

/// Generates a default manifest file with comments.
#[must_use]
pub fn default_manifest_template() -> String {
    r#"# app-settings manifest

# Dotted path of the settings module (default: "settings").
# The override prefix and the defaults path are derived from it:
#   myapp.conf.settings -> prefix "MYAPP", defaults "myapp.conf.defaults"
module = "myapp.conf.settings"

# Override prefix; a trailing "_" is ignored
# prefix = "MYAPP"

# Dotted path of the defaults table, loaded from <root>/<path>.toml
# defaults_path = "myapp.conf.defaults"

# Deprecated settings. Each needs a default until support is removed.
# Use renamed_to for drop-in replacements and replaced_by otherwise.
#
# [[deprecations]]
# setting = "OLD_TIMEOUT"
# renamed_to = "REQUEST_TIMEOUT"
# category = "deprecated"   # or "pending"
# guidance = "See the 2.0 release notes."
"#
    .to_string()
}
