//! Setting deprecation.
//!
//! This module provides:
//! - Deprecation records ([`DeprecatedSetting`])
//! - Warning severities ([`WarningCategory`])
//! - Structured warning events ([`DeprecationWarning`], [`WarningKind`])
//! - Warning delivery ([`WarningSink`], [`TracingSink`], [`WarningLog`], [`NullSink`])
//!
//! Deprecations never interrupt resolution: a warning is emitted and the
//! caller always gets a usable value back.

mod record;
mod warning;

#[cfg(test)]
mod warning_tests;

pub use record::DeprecatedSetting;
pub(crate) use record::prefixed_name;
pub use warning::{
    DeprecationWarning, NullSink, TracingSink, WarningCategory, WarningKind, WarningLog,
    WarningSink,
};
