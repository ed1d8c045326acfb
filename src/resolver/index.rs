//! The validated deprecation graph of one resolver.

use std::collections::HashMap;

use super::error::DefinitionError;
use crate::deprecation::DeprecatedSetting;
use crate::source::DefaultsTable;

/// Deprecated settings keyed by name, plus the reverse "replaced by" map.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeprecationIndex {
    records: HashMap<String, DeprecatedSetting>,
    /// Declaration order, for stable listing.
    order: Vec<String>,
    /// Replacement name to the deprecated names feeding it, in declaration order.
    replacements: HashMap<String, Vec<String>>,
}

/// Where the records come from, for error messages.
pub(crate) struct IndexContext<'a> {
    pub(crate) helper: &'a str,
    pub(crate) prefix: &'a str,
    pub(crate) defaults_path: &'a str,
    pub(crate) defaults: &'a DefaultsTable,
}

impl DeprecationIndex {
    /// Validates `records` against the defaults and indexes them.
    ///
    /// Fails on the first record that conflicts, lacks a default, repeats a
    /// name, or names a replacement without a default.
    pub(crate) fn build(
        records: impl IntoIterator<Item = DeprecatedSetting>,
        ctx: &IndexContext<'_>,
    ) -> Result<Self, DefinitionError> {
        let mut index = Self::default();

        for mut record in records {
            let setting_name = record.setting_name().to_string();

            if record.has_conflicting_targets() {
                return Err(DefinitionError::ConflictingReplacement {
                    renamed_to: record.renamed_target().unwrap_or_default().to_string(),
                    replaced_by: record.replaced_by_target().unwrap_or_default().to_string(),
                    setting_name,
                });
            }

            record.set_prefix(ctx.prefix);

            if !ctx.defaults.contains(&setting_name) {
                return Err(DefinitionError::MissingDefault {
                    setting_name,
                    defaults_path: ctx.defaults_path.to_string(),
                });
            }

            if index.records.contains_key(&setting_name) {
                return Err(DefinitionError::DuplicateDeprecation {
                    setting_name,
                    helper: ctx.helper.to_string(),
                });
            }

            if let Some(replacement) = record.replacement_name() {
                if !ctx.defaults.contains(replacement) {
                    return Err(DefinitionError::InvalidReplacement {
                        replacement_name: replacement.to_string(),
                        setting_name,
                        defaults_path: ctx.defaults_path.to_string(),
                    });
                }
                index
                    .replacements
                    .entry(replacement.to_string())
                    .or_default()
                    .push(setting_name.clone());
            }

            index.order.push(setting_name.clone());
            index.records.insert(setting_name, record);
        }

        Ok(index)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&DeprecatedSetting> {
        self.records.get(name)
    }

    /// Deprecated settings replaced by `name`, in declaration order.
    pub(crate) fn sources_for(&self, name: &str) -> &[String] {
        self.replacements.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Records in declaration order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &DeprecatedSetting> {
        self.order.iter().filter_map(|name| self.records.get(name))
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }
}
