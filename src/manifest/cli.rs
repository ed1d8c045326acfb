//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// app-settings: inspect a component's resolved settings
///
/// Loads a settings definition from a manifest, resolves every setting
/// against its defaults and the host application's overrides, and reports
/// values, sources and deprecations.
#[derive(Debug, Parser)]
#[command(name = "app-settings")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to the manifest file
    #[arg(long, short, global = true)]
    pub manifest: Option<PathBuf>,

    /// Settings module path (overrides the manifest's `module`)
    #[arg(long, global = true)]
    pub module: Option<String>,

    /// Directory defaults files are loaded from
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// TOML file with the host application's overrides
    #[arg(long, global = true, conflicts_with = "env")]
    pub overrides: Option<PathBuf>,

    /// Read overrides from environment variables
    #[arg(long, global = true)]
    pub env: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for app-settings
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a single setting
    Get {
        /// Setting name (unprefixed)
        name: String,

        /// Consider overrides of this deprecated setting
        #[arg(long = "accept-deprecated", value_name = "NAME")]
        accept_deprecated: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Resolve every setting
    List {
        /// Only list settings whose names match this regex
        #[arg(long, value_name = "REGEX")]
        filter: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate the settings definition and every resolved value
    Check,

    /// Generate a default manifest file
    Init {
        /// Output path for the manifest
        #[arg(long, short, default_value = "app-settings.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
