//! Error types for manifest loading and session setup.

use std::path::PathBuf;

use thiserror::Error;

use crate::resolver::DefinitionError;
use crate::source::OverridesError;

/// Error type for manifest and session operations.
///
/// Covers errors from reading files, parsing, and building the resolver.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Failed to read the manifest file.
    #[error("Failed to read manifest '{}': {source}", path.display())]
    FileRead {
        /// Path to the manifest
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML manifest.
    #[error("Failed to parse TOML manifest: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to write the manifest file (for init command).
    #[error("Failed to write manifest '{}': {source}", path.display())]
    FileWrite {
        /// Path to the manifest
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to load the overrides file.
    #[error(transparent)]
    Overrides(#[from] OverridesError),

    /// Invalid regex pattern for setting name filtering.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        /// The invalid pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// The settings definition described by the manifest is invalid.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}
