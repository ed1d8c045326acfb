//! Manifest and command-line layer for the `app-settings` tool.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML manifest parsing ([`Manifest`])
//! - Resolver assembly ([`Session`])
//! - Reports on resolved settings ([`SettingReport`], [`CheckSummary`])
//! - Manifest file generation ([`write_default_manifest`])
//!
//! # Priority
//!
//! The settings module path is resolved with the following priority
//! (highest to lowest):
//!
//! 1. **`--module`** on the command line
//! 2. **`module`** in the manifest
//! 3. **[`DEFAULT_MODULE`]**
//!
//! The prefix and defaults path come from the manifest when given and are
//! otherwise derived from the module path.

mod cli;
mod error;
mod report;
mod session;
mod toml;

#[cfg(test)]
mod toml_tests;

use std::path::Path;

pub use cli::{Cli, Command};
pub use error::ManifestError;
pub use report::{CheckSummary, SettingReport, compile_filter, report_all};
pub use session::Session;
pub use toml::{DEFAULT_MODULE, DeprecationEntry, Manifest, default_manifest_template};

/// Writes the default manifest template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_manifest(path: &Path) -> Result<(), ManifestError> {
    std::fs::write(path, default_manifest_template()).map_err(|e| ManifestError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
