//! Error types for the resolver's collaborators.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a defaults table.
#[derive(Debug, Error)]
pub enum DefaultsError {
    /// The defaults path is malformed or names nothing loadable.
    #[error("'{path}' is not a valid defaults path")]
    InvalidPath {
        /// The dotted path that was requested
        path: String,
    },

    /// The defaults file exists but could not be read.
    #[error("Failed to read defaults file '{}': {source}", file.display())]
    Read {
        /// File the dotted path mapped to
        file: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The defaults file is not valid TOML.
    #[error("Failed to parse defaults file '{}': {source}", file.display())]
    Parse {
        /// File the dotted path mapped to
        file: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}

/// Failure to load an override file.
#[derive(Debug, Error)]
pub enum OverridesError {
    /// Failed to read the override file.
    #[error("Failed to read overrides file '{}': {source}", path.display())]
    Read {
        /// Path to the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the TOML content.
    #[error("Failed to parse overrides: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure to import a module by dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The path is not a well-formed dotted path.
    #[error("'{path}' is not a valid import path")]
    InvalidPath {
        /// The requested path
        path: String,
    },

    /// No module is known under this path.
    #[error("No module named '{path}'")]
    NotFound {
        /// The requested path
        path: String,
    },
}

/// Failure to look up a data model by reference.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelLookupError {
    /// The reference is not of the form `app_label.Model`.
    #[error("'{reference}' is not of the form 'app_label.Model'")]
    Malformed {
        /// The requested reference
        reference: String,
    },

    /// The reference is well-formed but no such model is registered.
    #[error("Model '{reference}' is not registered")]
    NotRegistered {
        /// The requested reference
        reference: String,
    },
}
