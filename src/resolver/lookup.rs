//! Per-call lookup options and value provenance.

use std::fmt;

use crate::value::TypeRequirement;

/// Options for a single setting lookup.
///
/// # Examples
///
/// ```
/// use app_settings::resolver::Lookup;
/// use app_settings::value::ValueKind;
///
/// let lookup = Lookup::new()
///     .accept_deprecated("OLD_BACKEND")
///     .enforce_type(ValueKind::String)
///     .suppress_warnings();
///
/// assert_eq!(lookup.accepted_deprecated(), Some("OLD_BACKEND"));
/// assert!(lookup.warnings_suppressed());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookup {
    accept_deprecated: Option<String>,
    enforce_type: Option<TypeRequirement>,
    suppress_warnings: bool,
}

impl Lookup {
    /// Default options: automatic deprecated-source handling, no type check, warnings on.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only consider overrides of this deprecated name when the requested
    /// setting is not overridden itself.
    ///
    /// Required to pick a source when several deprecated settings were
    /// merged into the requested one.
    #[must_use]
    pub fn accept_deprecated(mut self, deprecated_name: impl Into<String>) -> Self {
        self.accept_deprecated = Some(deprecated_name.into());
        self
    }

    /// Require the resolved value to be of the given kind(s).
    #[must_use]
    pub fn enforce_type(mut self, requirement: impl Into<TypeRequirement>) -> Self {
        self.enforce_type = Some(requirement.into());
        self
    }

    /// Do not emit deprecation warnings for this lookup.
    #[must_use]
    pub const fn suppress_warnings(mut self) -> Self {
        self.suppress_warnings = true;
        self
    }

    /// The deprecated name to accept, if restricted.
    #[must_use]
    pub fn accepted_deprecated(&self) -> Option<&str> {
        self.accept_deprecated.as_deref()
    }

    /// The type requirement, if any.
    #[must_use]
    pub const fn type_requirement(&self) -> Option<&TypeRequirement> {
        self.enforce_type.as_ref()
    }

    /// `true` if warnings are suppressed.
    #[must_use]
    pub const fn warnings_suppressed(&self) -> bool {
        self.suppress_warnings
    }
}

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// The host application overrides the setting under its own name.
    Override,
    /// The host application overrides a deprecated setting feeding this one.
    DeprecatedOverride(String),
    /// No override applies; the component's default is used.
    Default,
}

impl ValueSource {
    /// `true` for either kind of override.
    #[must_use]
    pub const fn is_override(&self) -> bool {
        !matches!(self, Self::Default)
    }
}

impl fmt::Display for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => write!(f, "override"),
            Self::DeprecatedOverride(old) => write!(f, "override via deprecated {old}"),
            Self::Default => write!(f, "default"),
        }
    }
}
