//! Tests for TOML manifest parsing.

use super::toml::{DEFAULT_MODULE, Manifest, default_manifest_template};
use super::{ManifestError, write_default_manifest};
use crate::deprecation::{DeprecatedSetting, WarningCategory};

mod parsing {
    use super::*;

    #[test]
    fn parse_empty_manifest() {
        let manifest = Manifest::parse("").unwrap();

        assert!(manifest.module.is_none());
        assert!(manifest.prefix.is_none());
        assert!(manifest.deprecations.is_empty());
    }

    #[test]
    fn parse_full_manifest() {
        let toml = r#"
            module = "polls.conf.settings"
            prefix = "POLLS"
            defaults_path = "polls.conf.defaults"

            [[deprecations]]
            setting = "MAX_CHOICES"
            renamed_to = "CHOICE_LIMIT"

            [[deprecations]]
            setting = "BACKEND"
            replaced_by = "BACKENDS"
            category = "pending"
            guidance = "See the release notes."
        "#;

        let manifest = Manifest::parse(toml).unwrap();

        assert_eq!(manifest.module.as_deref(), Some("polls.conf.settings"));
        assert_eq!(manifest.prefix.as_deref(), Some("POLLS"));
        assert_eq!(manifest.defaults_path.as_deref(), Some("polls.conf.defaults"));
        assert_eq!(manifest.deprecations.len(), 2);
        assert_eq!(manifest.deprecations[0].category, WarningCategory::Deprecated);
        assert_eq!(manifest.deprecations[1].category, WarningCategory::Pending);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Manifest::parse("modul = \"typo.settings\"");

        assert!(matches!(result, Err(ManifestError::TomlParse(_))));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let toml = r#"
            [[deprecations]]
            setting = "A"
            category = "someday"
        "#;

        assert!(Manifest::parse(toml).is_err());
    }

    #[test]
    fn entries_convert_to_records() {
        let toml = r#"
            [[deprecations]]
            setting = "BACKEND"
            replaced_by = "BACKENDS"
            guidance = "See the release notes."
        "#;
        let mut manifest = Manifest::parse(toml).unwrap();

        let record = DeprecatedSetting::from(manifest.deprecations.remove(0));

        assert_eq!(record.setting_name(), "BACKEND");
        assert_eq!(record.replacement_name(), Some("BACKENDS"));
        assert!(!record.is_renamed());
        assert_eq!(record.additional_guidance(), Some("See the release notes."));
    }
}

mod builder {
    use super::*;
    use crate::source::{DefaultsTable, MemoryOverrides, StaticDefaults};

    #[test]
    fn cli_module_wins_over_manifest_module() {
        let manifest = Manifest::parse("module = \"from_manifest.settings\"").unwrap();
        let loader = StaticDefaults::new().with(
            "from_cli.defaults",
            DefaultsTable::from_bindings([("A", 1)]),
        );

        let resolver = manifest
            .into_builder(Some("from_cli::settings"))
            .defaults_loader(loader)
            .overrides(MemoryOverrides::new())
            .build()
            .unwrap();

        assert_eq!(resolver.prefix(), "FROM_CLI");
    }

    #[test]
    fn falls_back_to_default_module() {
        let loader =
            StaticDefaults::new().with("defaults", DefaultsTable::from_bindings([("A", 1)]));

        let resolver = Manifest::default()
            .into_builder(None)
            .defaults_loader(loader)
            .overrides(MemoryOverrides::new())
            .build()
            .unwrap();

        assert_eq!(resolver.module_path(), DEFAULT_MODULE);
        assert_eq!(resolver.prefix(), "");
    }
}

mod template {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn template_parses() {
        let manifest = Manifest::parse(&default_manifest_template()).unwrap();

        assert_eq!(manifest.module.as_deref(), Some("myapp.conf.settings"));
        assert!(manifest.deprecations.is_empty());
    }

    #[test]
    fn write_default_manifest_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app-settings.toml");

        write_default_manifest(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, default_manifest_template());
    }

    #[test]
    fn write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("app-settings.toml");

        assert!(matches!(
            write_default_manifest(&path),
            Err(ManifestError::FileWrite { .. })
        ));
    }
}
