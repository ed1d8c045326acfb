//! A resolver assembled from CLI arguments and a manifest.

use std::fmt;
use std::path::Path;

use super::toml::Manifest;
use super::{Cli, ManifestError};
use crate::resolver::SettingsResolver;
use crate::source::{EnvOverrides, MemoryOverrides, TomlDefaultsLoader};

/// Everything a command needs: the built resolver plus output options.
///
/// # Priority
///
/// The module path comes from `--module`, then the manifest, then
/// [`super::DEFAULT_MODULE`]. Overrides come from `--overrides FILE`, from
/// the environment with `--env`, or are empty.
#[derive(Debug)]
pub struct Session {
    resolver: SettingsResolver,
    verbose: bool,
}

impl Session {
    /// Loads the manifest named on the command line (if any) and builds the resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if the
    /// settings definition is invalid.
    pub fn load(cli: &Cli) -> Result<Self, ManifestError> {
        let manifest = match &cli.manifest {
            Some(path) => Manifest::load(path)?,
            None => Manifest::default(),
        };
        Self::from_manifest(cli, manifest)
    }

    /// Builds the resolver from an already parsed manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the overrides file cannot be loaded or the
    /// settings definition is invalid.
    pub fn from_manifest(cli: &Cli, manifest: Manifest) -> Result<Self, ManifestError> {
        let builder = manifest
            .into_builder(cli.module.as_deref())
            .defaults_loader(TomlDefaultsLoader::new(cli.root.clone()));

        let builder = match (&cli.overrides, cli.env) {
            (Some(path), _) => builder.overrides(load_overrides(path)?),
            (None, true) => builder.overrides(EnvOverrides::new()),
            (None, false) => builder.overrides(MemoryOverrides::new()),
        };

        Ok(Self {
            resolver: builder.build()?,
            verbose: cli.verbose,
        })
    }

    /// The built resolver.
    #[must_use]
    pub const fn resolver(&self) -> &SettingsResolver {
        &self.resolver
    }

    /// Whether verbose logging was requested.
    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }
}

fn load_overrides(path: &Path) -> Result<MemoryOverrides, ManifestError> {
    let overrides = MemoryOverrides::load(path)?;
    tracing::debug!(
        "Loaded {} override(s) from {}",
        overrides.len(),
        path.display()
    );
    Ok(overrides)
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolver = &self.resolver;
        write!(
            f,
            "Settings: module={}, prefix={}, defaults={}, settings={}, deprecations={}",
            resolver.module_path(),
            if resolver.prefix().is_empty() {
                "(none)"
            } else {
                resolver.prefix()
            },
            resolver.defaults_path(),
            resolver.defaults().len(),
            resolver.deprecations().count(),
        )
    }
}
