//! Command execution.
//!
//! Each command except `init` resolves settings through a session's
//! resolver and renders the result as text or JSON.

use std::path::Path;
use std::process::ExitCode;

use thiserror::Error;

use app_settings::manifest::{
    CheckSummary, Cli, Command, ManifestError, Session, SettingReport, compile_filter,
    report_all, write_default_manifest,
};
use app_settings::resolver::{Lookup, ResolveError};

use crate::app::exit_code;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for command failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// A setting could not be resolved.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Manifest or argument problem discovered while running.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Failed to render JSON output.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RunError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Manifest(_) => exit_code::CONFIG_ERROR,
            Self::Resolve(_) | Self::Json(_) => exit_code::resolution_error(),
        }
    }
}

/// Runs the parsed command line and returns its output.
///
/// `init` writes the manifest template; every other command loads the
/// manifest and resolves settings through the resulting session.
///
/// # Errors
///
/// Returns an error if the manifest or settings definition is invalid, a
/// setting cannot be resolved, or the output cannot be rendered.
pub fn execute(cli: &Cli) -> Result<String, RunError> {
    match &cli.command {
        Command::Init { output } => init(output),
        Command::Get {
            name,
            accept_deprecated,
            json,
        } => {
            let session = load(cli)?;
            let mut lookup = Lookup::new();
            if let Some(old) = accept_deprecated {
                lookup = lookup.accept_deprecated(old.as_str());
            }
            let report = SettingReport::resolve(session.resolver(), name, &lookup)?;
            render(&report, *json)
        }
        Command::List { filter, json } => {
            let session = load(cli)?;
            let filter = compile_filter(filter.as_deref())?;
            let reports = report_all(session.resolver(), filter.as_ref())?;
            tracing::debug!("Resolved {} setting(s)", reports.len());
            if *json {
                Ok(serde_json::to_string_pretty(&reports)?)
            } else {
                Ok(reports
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
        Command::Check => {
            let session = load(cli)?;
            let summary = CheckSummary::run(session.resolver())?;
            tracing::debug!(
                "Checked {}: {} deprecated override(s)",
                summary.module,
                summary.deprecated_overrides.len()
            );
            Ok(summary.to_string())
        }
    }
}

fn init(output: &Path) -> Result<String, RunError> {
    write_default_manifest(output)?;
    Ok(format!("Manifest template written to: {}", output.display()))
}

fn load(cli: &Cli) -> Result<Session, RunError> {
    let session = Session::load(cli)?;
    tracing::debug!("{session}");
    Ok(session)
}

fn render(report: &SettingReport, json: bool) -> Result<String, RunError> {
    if json {
        Ok(serde_json::to_string_pretty(report)?)
    } else {
        Ok(report.to_string())
    }
}
