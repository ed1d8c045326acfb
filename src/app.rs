//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use app_settings::manifest::ManifestError;
use app_settings::resolver::DefinitionError;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - bad manifest, invalid settings definition, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Resolution error (exit code 2) - a setting that cannot be resolved or imported.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn resolution_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ManifestError) {
    match error {
        ManifestError::FileRead { .. } => {
            eprintln!("\nRun 'app-settings init' to generate a manifest template.");
        }
        ManifestError::Definition(DefinitionError::Defaults { .. }) => {
            eprintln!(
                "\nDefaults are loaded from <root>/<defaults path>.toml; check --root and the module path."
            );
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
