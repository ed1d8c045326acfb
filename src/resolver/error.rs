//! Error types for resolver construction and setting resolution.

use std::fmt;

use thiserror::Error;

use crate::source::{DefaultsError, ImportError, ModelLookupError};
use crate::value::SettingValue;

/// Something about a resolver's static definition is wrong.
///
/// These are programming errors by the component author. They are raised
/// while the resolver is built and are never retried.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// The defaults table could not be loaded.
    #[error("The defaults path '{path}' provided for {helper} is invalid: {source}")]
    Defaults {
        /// Module path of the settings definition
        helper: String,
        /// Dotted defaults path that failed to load
        path: String,
        /// Underlying loader error
        #[source]
        source: DefaultsError,
    },

    /// A prefix or defaults path had to be derived from a malformed module path.
    #[error("'{0}' is not a valid module path to derive settings locations from")]
    InvalidModulePath(String),

    /// A deprecated setting has no default value.
    #[error(
        "There is an issue with one of your setting deprecation definitions. \
         '{setting_name}' could not be found in {defaults_path}. Please ensure a default value \
         remains there until the end of the setting's deprecation period."
    )]
    MissingDefault {
        /// The deprecated setting name
        setting_name: String,
        /// Where defaults were loaded from
        defaults_path: String,
    },

    /// Two deprecation definitions share a setting name.
    #[error(
        "The setting name for each deprecation definition must be unique, but \
         '{setting_name}' has been used more than once for {helper}."
    )]
    DuplicateDeprecation {
        /// The repeated setting name
        setting_name: String,
        /// Module path of the settings definition
        helper: String,
    },

    /// A deprecation names a replacement that has no default value.
    #[error(
        "There is an issue with one of your settings deprecation definitions. \
         '{replacement_name}' is not a valid replacement for '{setting_name}', as no such value \
         can be found in {defaults_path}."
    )]
    InvalidReplacement {
        /// The replacement name that could not be found
        replacement_name: String,
        /// The deprecated setting naming it
        setting_name: String,
        /// Where defaults were loaded from
        defaults_path: String,
    },

    /// A deprecation names both a rename target and a replacement.
    #[error(
        "The deprecation definition for '{setting_name}' cannot be both renamed to \
         '{renamed_to}' and replaced by '{replaced_by}'. Please supply only one."
    )]
    ConflictingReplacement {
        /// The deprecated setting name
        setting_name: String,
        /// The rename target
        renamed_to: String,
        /// The replacement target
        replaced_by: String,
    },
}

/// What is wrong with a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueErrorKind {
    /// The value has the wrong type.
    TypeInvalid,
    /// The value has the right type but the wrong shape.
    FormatInvalid,
    /// The value is well-formed but what it references does not exist.
    NotImportable,
}

impl fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeInvalid => write!(f, "invalid type"),
            Self::FormatInvalid => write!(f, "invalid format"),
            Self::NotImportable => write!(f, "not importable"),
        }
    }
}

/// The collaborator failure behind a [`ValueError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupFailure {
    /// The importer could not provide the module.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The model registry rejected the reference.
    #[error(transparent)]
    Model(#[from] ModelLookupError),
}

/// Details of an invalid setting value.
///
/// Whether the value came from an override or a default is carried by the
/// enclosing [`ResolveError`] variant.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValueError {
    /// What is wrong with the value.
    pub kind: ValueErrorKind,
    /// The setting that was requested (unprefixed).
    pub setting_name: String,
    /// The offending value.
    pub value: SettingValue,
    /// Full, actionable message naming the setting and where it was defined.
    pub message: String,
    /// Import or model lookup error, for values that could not be resolved.
    #[source]
    pub source: Option<LookupFailure>,
}

/// Failure to resolve a setting.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The setting is neither overridden nor declared in the defaults table.
    #[error("No default value could be found in {defaults_path} with the name '{setting_name}'.")]
    NoDefault {
        /// The requested setting
        setting_name: String,
        /// Where defaults were loaded from
        defaults_path: String,
    },

    /// The name is not a declared setting.
    #[error("'{setting_name}' is not a valid setting name for {helper}.")]
    UnknownSetting {
        /// The requested name
        setting_name: String,
        /// Module path of the settings definition
        helper: String,
    },

    /// `accept_deprecated` names a setting that is not replaced by the requested one.
    #[error("'{deprecated_name}' is not a deprecated setting replaced by '{setting_name}'.")]
    NotReplacedBy {
        /// The requested setting
        setting_name: String,
        /// The deprecated name the caller asked to accept
        deprecated_name: String,
    },

    /// The host application's override is invalid.
    #[error("{0}")]
    Override(ValueError),

    /// The component's own default is invalid.
    #[error("{0}")]
    Default(ValueError),
}

impl ResolveError {
    /// The value error, for [`Self::Override`] and [`Self::Default`].
    #[must_use]
    pub const fn value_error(&self) -> Option<&ValueError> {
        match self {
            Self::Override(e) | Self::Default(e) => Some(e),
            _ => None,
        }
    }

    /// The value error kind, for [`Self::Override`] and [`Self::Default`].
    #[must_use]
    pub const fn value_kind(&self) -> Option<ValueErrorKind> {
        match self.value_error() {
            Some(e) => Some(e.kind),
            None => None,
        }
    }

    /// `true` if an override value is at fault.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }

    /// `true` if a default value is at fault.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default(_))
    }
}
