//! Deprecation records and warning message formatting.

use super::warning::{DeprecationWarning, WarningCategory, WarningKind, WarningSink};

/// Joins a resolver prefix and a setting name into the name used by the
/// override store (`PREFIX_NAME`, or just `NAME` for an empty prefix).
pub(crate) fn prefixed_name(prefix: &str, setting_name: &str) -> String {
    if prefix.is_empty() {
        setting_name.to_string()
    } else {
        format!("{prefix}_{setting_name}")
    }
}

/// Describes one deprecated setting and renders warnings about it.
///
/// Records are declared by the component author and handed to a resolver,
/// which assigns the prefix once it owns them.
///
/// # Examples
///
/// ```
/// use app_settings::deprecation::{DeprecatedSetting, WarningCategory};
///
/// let dropped = DeprecatedSetting::new("OLD_FLAG");
/// let renamed = DeprecatedSetting::new("TIMEOUT").renamed_to("REQUEST_TIMEOUT");
/// let replaced = DeprecatedSetting::new("BACKEND")
///     .replaced_by("BACKENDS")
///     .category(WarningCategory::Pending)
///     .guidance("See the 2.0 release notes.");
///
/// assert!(dropped.replacement_name().is_none());
/// assert!(renamed.is_renamed());
/// assert!(!replaced.is_renamed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecatedSetting {
    setting_name: String,
    renamed_to: Option<String>,
    replaced_by: Option<String>,
    category: WarningCategory,
    additional_guidance: Option<String>,
    prefix: String,
}

impl DeprecatedSetting {
    /// Declares `setting_name` as deprecated with no replacement.
    #[must_use]
    pub fn new(setting_name: impl Into<String>) -> Self {
        Self {
            setting_name: setting_name.into(),
            renamed_to: None,
            replaced_by: None,
            category: WarningCategory::default(),
            additional_guidance: None,
            prefix: String::new(),
        }
    }

    /// The setting was renamed; `new_name` is a drop-in equivalent.
    #[must_use]
    pub fn renamed_to(mut self, new_name: impl Into<String>) -> Self {
        self.renamed_to = Some(new_name.into());
        self
    }

    /// The setting is superseded by `new_name`, which is not a like-for-like substitute.
    #[must_use]
    pub fn replaced_by(mut self, new_name: impl Into<String>) -> Self {
        self.replaced_by = Some(new_name.into());
        self
    }

    /// Sets the warning severity.
    #[must_use]
    pub const fn category(mut self, category: WarningCategory) -> Self {
        self.category = category;
        self
    }

    /// Appends extra guidance to every warning message.
    #[must_use]
    pub fn guidance(mut self, text: impl Into<String>) -> Self {
        self.additional_guidance = Some(text.into());
        self
    }

    /// The deprecated setting name.
    #[must_use]
    pub fn setting_name(&self) -> &str {
        &self.setting_name
    }

    /// The rename or "replaced by" target, if any.
    #[must_use]
    pub fn replacement_name(&self) -> Option<&str> {
        self.renamed_to.as_deref().or(self.replaced_by.as_deref())
    }

    /// The rename target, if any.
    #[must_use]
    pub fn renamed_target(&self) -> Option<&str> {
        self.renamed_to.as_deref()
    }

    /// The "replaced by" target, if any.
    #[must_use]
    pub fn replaced_by_target(&self) -> Option<&str> {
        self.replaced_by.as_deref()
    }

    /// `true` when the replacement is a rename.
    #[must_use]
    pub const fn is_renamed(&self) -> bool {
        self.renamed_to.is_some()
    }

    /// `true` when both a rename and a replacement target were given.
    #[must_use]
    pub(crate) const fn has_conflicting_targets(&self) -> bool {
        self.renamed_to.is_some() && self.replaced_by.is_some()
    }

    /// The warning severity.
    #[must_use]
    pub const fn warning_category(&self) -> WarningCategory {
        self.category
    }

    /// Extra guidance appended to messages, if any.
    #[must_use]
    pub fn additional_guidance(&self) -> Option<&str> {
        self.additional_guidance.as_deref()
    }

    /// The owning resolver's prefix (empty until prepared).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub(crate) fn set_prefix(&mut self, prefix: &str) {
        prefix.clone_into(&mut self.prefix);
    }

    /// Message for code that references the deprecated setting on a resolver.
    #[must_use]
    pub fn attribute_message(&self) -> String {
        let name = &self.setting_name;
        let removed_in = self.category.removed_in_text();
        let message = match self.replacement_name() {
            None => format!(
                "The {name} settings helper attribute is deprecated. Please remove any \
                 references to 'settings.{name}' from your project, as this will raise an \
                 error after support is removed in {removed_in}."
            ),
            Some(new) => {
                let lead = if self.is_renamed() {
                    format!("The {name} settings helper attribute has been renamed to {new}.")
                } else {
                    format!(
                        "The {name} settings helper attribute is deprecated in favour of using \
                         {new}."
                    )
                };
                format!(
                    "{lead} Please update your code to reference 'settings.{new}' instead, as \
                     continuing to reference 'settings.{name}' will raise an error after \
                     support is removed in {removed_in}."
                )
            }
        };
        self.with_guidance(message)
    }

    /// Message for a host application still overriding the setting by its old name.
    #[must_use]
    pub fn old_override_message(&self) -> String {
        let old = prefixed_name(&self.prefix, &self.setting_name);
        let removed_in = self.category.removed_in_text();
        let lead = match self.replacement_name() {
            Some(new) if self.is_renamed() => format!(
                "The {old} setting has been renamed to {}.",
                prefixed_name(&self.prefix, new)
            ),
            Some(new) => format!(
                "The {old} setting is deprecated in favour of using {}.",
                prefixed_name(&self.prefix, new)
            ),
            None => format!("The {old} setting is deprecated."),
        };
        self.with_guidance(format!(
            "{lead} Please update your settings to use the new setting, otherwise the app will \
             revert to its default behaviour in {removed_in} (when support for {old} will be \
             removed entirely)."
        ))
    }

    fn with_guidance(&self, message: String) -> String {
        match &self.additional_guidance {
            Some(extra) => format!("{message} {extra}"),
            None => message,
        }
    }

    fn warning(&self, kind: WarningKind, message: String) -> DeprecationWarning {
        DeprecationWarning {
            kind,
            category: self.category,
            setting_name: self.setting_name.clone(),
            replacement_name: self.replacement_name().map(str::to_string),
            message,
        }
    }

    /// The warning for a reference to this setting, without emitting it.
    #[must_use]
    pub fn attribute_warning(&self) -> DeprecationWarning {
        self.warning(WarningKind::AttributeReferenced, self.attribute_message())
    }

    /// The warning for an override under the old name, without emitting it.
    #[must_use]
    pub fn old_override_warning(&self) -> DeprecationWarning {
        self.warning(WarningKind::OldOverrideUsed, self.old_override_message())
    }

    /// Emits a warning that the resolver attribute for this setting is deprecated.
    ///
    /// Returns the emitted warning.
    pub fn warn_on_attribute_reference(&self, sink: &dyn WarningSink) -> DeprecationWarning {
        let warning = self.attribute_warning();
        sink.emit(warning.clone());
        warning
    }

    /// Emits a warning that the host application overrides this setting
    /// under its deprecated, prefixed name.
    ///
    /// Returns the emitted warning.
    pub fn warn_on_override_using_old_name(&self, sink: &dyn WarningSink) -> DeprecationWarning {
        let warning = self.old_override_warning();
        sink.emit(warning.clone());
        warning
    }
}
