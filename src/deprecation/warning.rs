//! Warning events and sinks.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

/// How soon a deprecated setting will be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningCategory {
    /// Support is removed in the next version.
    #[default]
    Deprecated,
    /// Support is removed in two versions time.
    #[serde(alias = "pending-deprecation")]
    Pending,
}

impl WarningCategory {
    /// Returns `true` when removal is due in the next version.
    #[must_use]
    pub const fn is_imminent(self) -> bool {
        matches!(self, Self::Deprecated)
    }

    /// Wording used in messages for when support ends.
    #[must_use]
    pub const fn removed_in_text(self) -> &'static str {
        match self {
            Self::Deprecated => "the next version",
            Self::Pending => "two versions time",
        }
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deprecated => write!(f, "DeprecationWarning"),
            Self::Pending => write!(f, "PendingDeprecationWarning"),
        }
    }
}

/// What triggered a deprecation warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Code asked the resolver for a deprecated setting by name.
    AttributeReferenced,
    /// The host application overrides a setting using its deprecated name.
    OldOverrideUsed,
}

/// A deprecation warning, delivered to a [`WarningSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeprecationWarning {
    /// What triggered the warning.
    pub kind: WarningKind,
    /// Severity of the deprecation.
    pub category: WarningCategory,
    /// The deprecated setting name (unprefixed).
    pub setting_name: String,
    /// The replacement setting name (unprefixed), if any.
    pub replacement_name: Option<String>,
    /// Rendered, human-readable message.
    pub message: String,
}

impl fmt::Display for DeprecationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

/// Destination for deprecation warnings.
///
/// Sinks must be `Send + Sync` since a resolver is usually shared
/// across the whole process.
pub trait WarningSink: Send + Sync {
    /// Receives one warning.
    fn emit(&self, warning: DeprecationWarning);
}

/// Logs warnings through `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn emit(&self, warning: DeprecationWarning) {
        tracing::warn!(
            setting = %warning.setting_name,
            replacement = warning.replacement_name.as_deref().unwrap_or("none"),
            category = %warning.category,
            "{}",
            warning.message
        );
    }
}

/// Discards every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl WarningSink for NullSink {
    fn emit(&self, _warning: DeprecationWarning) {}
}

/// Collects warnings in memory so callers can inspect them.
#[derive(Debug, Default)]
pub struct WarningLog {
    entries: Mutex<Vec<DeprecationWarning>>,
}

impl WarningLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every warning received so far.
    #[must_use]
    pub fn warnings(&self) -> Vec<DeprecationWarning> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of warnings received so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no warning has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns every warning received so far.
    pub fn take(&self) -> Vec<DeprecationWarning> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl WarningSink for WarningLog {
    fn emit(&self, warning: DeprecationWarning) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}

impl<T: WarningSink + ?Sized> WarningSink for std::sync::Arc<T> {
    fn emit(&self, warning: DeprecationWarning) {
        (**self).emit(warning);
    }
}
