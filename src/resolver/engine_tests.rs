//! Tests for raw value resolution, type enforcement and caching.

use super::fixtures::Harness;
use super::{Lookup, ResolveError, ValueErrorKind, ValueSource};
use crate::source::MemoryOverrides;
use crate::value::{SettingValue, ValueKind};

mod precedence {
    use super::*;

    #[test]
    fn default_is_used_without_override() {
        let h = Harness::new(MemoryOverrides::new());

        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(1234)
        );
        assert_eq!(
            h.resolver.get_raw("STRING_SETTING").unwrap(),
            SettingValue::from("abc")
        );
        assert!(h.warnings.is_empty());
    }

    #[test]
    fn override_beats_default() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_INTEGER_SETTING", 5));

        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(5)
        );
        assert!(h.resolver.is_overridden("INTEGER_SETTING"));
    }

    #[test]
    fn unprefixed_override_is_ignored() {
        let h = Harness::new(MemoryOverrides::new().with("INTEGER_SETTING", 5));

        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(1234)
        );
    }

    #[test]
    fn override_of_deprecated_setting_beats_its_default() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_DEPRECATED_SETTING", "custom"));

        assert_eq!(
            h.resolver.get_raw("DEPRECATED_SETTING").unwrap(),
            SettingValue::from("custom")
        );
    }

    #[test]
    fn override_without_default_still_resolves() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_UNDECLARED", 1));

        assert_eq!(
            h.resolver.get_raw("UNDECLARED").unwrap(),
            SettingValue::Integer(1)
        );
    }

    #[test]
    fn missing_everything_is_no_default() {
        let h = Harness::new(MemoryOverrides::new());

        let err = h.resolver.get_raw("UNDECLARED").unwrap_err();

        assert!(matches!(err, ResolveError::NoDefault { .. }));
        assert_eq!(
            err.to_string(),
            "No default value could be found in tests.conf.defaults with the name 'UNDECLARED'."
        );
    }

    #[test]
    fn get_rejects_undeclared_names() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_UNDECLARED", 1));

        assert!(matches!(
            h.resolver.get("UNDECLARED"),
            Err(ResolveError::UnknownSetting { .. })
        ));
        assert_eq!(
            h.resolver.get("BOOLEAN_SETTING").unwrap(),
            SettingValue::Bool(true)
        );
    }

    #[test]
    fn default_value_ignores_overrides() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_INTEGER_SETTING", 5));

        assert_eq!(
            h.resolver.default_value("INTEGER_SETTING").unwrap(),
            &SettingValue::Integer(1234)
        );
        assert!(h.resolver.default_value("UNDECLARED").is_err());
    }
}

mod type_enforcement {
    use super::*;

    #[test]
    fn matching_type_passes() {
        let h = Harness::new(MemoryOverrides::new());

        let value = h
            .resolver
            .get_raw_with("INTEGER_SETTING", &Lookup::new().enforce_type(ValueKind::Integer))
            .unwrap();

        assert_eq!(value, SettingValue::Integer(1234));
    }

    #[test]
    fn any_of_requirement_accepts_listed_kinds() {
        let h = Harness::new(MemoryOverrides::new());
        let lookup = Lookup::new().enforce_type([ValueKind::Bool, ValueKind::Integer]);

        assert!(h.resolver.get_raw_with("BOOLEAN_SETTING", &lookup).is_ok());
        assert!(h.resolver.get_raw_with("INTEGER_SETTING", &lookup).is_ok());
        assert!(h.resolver.get_raw_with("STRING_SETTING", &lookup).is_err());
    }

    #[test]
    fn override_mismatch_blames_the_override() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_STRING_SETTING", 99));

        let err = h
            .resolver
            .get_raw_with("STRING_SETTING", &Lookup::new().enforce_type(ValueKind::String))
            .unwrap_err();

        assert!(err.is_override());
        assert_eq!(err.value_kind(), Some(ValueErrorKind::TypeInvalid));
        assert_eq!(
            err.to_string(),
            "There is an issue with the value specified for TESTS_STRING_SETTING in your \
             project's settings. The value is expected to be a 'string', but a value of type \
             'integer' was found."
        );
        let details = err.value_error().unwrap();
        assert_eq!(details.setting_name, "STRING_SETTING");
        assert_eq!(details.value, SettingValue::Integer(99));
    }

    #[test]
    fn default_mismatch_blames_the_default() {
        let h = Harness::new(MemoryOverrides::new());

        let err = h
            .resolver
            .get_raw_with("STRING_SETTING", &Lookup::new().enforce_type(ValueKind::Integer))
            .unwrap_err();

        assert!(err.is_default());
        assert_eq!(err.value_kind(), Some(ValueErrorKind::TypeInvalid));
        assert!(err.to_string().starts_with(
            "There is an issue with the default value specified for STRING_SETTING in \
             tests.conf.defaults."
        ));
    }

    #[test]
    fn cached_values_are_still_checked() {
        let h = Harness::new(MemoryOverrides::new());
        h.resolver.get_raw("STRING_SETTING").unwrap();

        let result = h
            .resolver
            .get_raw_with("STRING_SETTING", &Lookup::new().enforce_type(ValueKind::Bool));

        assert!(matches!(result, Err(ResolveError::Default(_))));
    }

    #[test]
    fn failed_check_is_not_cached() {
        let h = Harness::new(MemoryOverrides::new());

        let _ = h
            .resolver
            .get_raw_with("STRING_SETTING", &Lookup::new().enforce_type(ValueKind::Bool));

        assert_eq!(h.resolver.cache_stats().raw, 0);
    }
}

mod caching {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::super::fixtures::{MODULE_PATH, sample_loader, sample_modules};
    use super::super::{ResolverBuilder, SettingsResolver};
    use crate::deprecation::NullSink;
    use crate::source::{Listener, OverrideStore, Subscription};

    #[test]
    fn resolved_values_are_cached() {
        let h = Harness::new(MemoryOverrides::new());

        h.resolver.get_raw("INTEGER_SETTING").unwrap();
        h.resolver.get_raw("INTEGER_SETTING").unwrap();
        h.resolver.get_raw("STRING_SETTING").unwrap();

        assert_eq!(h.resolver.cache_stats().raw, 2);
    }

    #[test]
    fn clear_caches_empties_everything() {
        let h = Harness::new(MemoryOverrides::new());
        h.resolver.get_raw("INTEGER_SETTING").unwrap();
        h.resolver.get_module("MODULE_SETTING").unwrap();

        h.resolver.clear_caches();

        assert_eq!(h.resolver.cache_stats().total(), 0);
    }

    #[test]
    fn override_changes_invalidate_caches() {
        let h = Harness::new(MemoryOverrides::new());
        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(1234)
        );

        h.overrides.set("TESTS_INTEGER_SETTING", 5);

        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(5)
        );

        h.overrides.remove("TESTS_INTEGER_SETTING");

        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(1234)
        );
    }

    #[test]
    fn unsubscribed_resolver_keeps_stale_values_until_cleared() {
        let mut h = Harness::new(MemoryOverrides::new());
        h.resolver.unsubscribe();
        h.resolver.get_raw("INTEGER_SETTING").unwrap();

        h.overrides.set("TESTS_INTEGER_SETTING", 5);
        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(1234)
        );

        h.resolver.clear_caches();
        assert_eq!(
            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(5)
        );
    }

    /// Override store that changes a value (and notifies) right after the
    /// first read of it, as a concurrent writer would.
    struct ChangingStore {
        inner: MemoryOverrides,
        name: &'static str,
        replacement: SettingValue,
        changed: AtomicBool,
    }

    impl ChangingStore {
        fn new(
            inner: MemoryOverrides,
            name: &'static str,
            replacement: impl Into<SettingValue>,
        ) -> Self {
            Self {
                inner,
                name,
                replacement: replacement.into(),
                changed: AtomicBool::new(false),
            }
        }
    }

    impl OverrideStore for ChangingStore {
        fn get(&self, name: &str) -> Option<SettingValue> {
            let value = self.inner.get(name);
            if name == self.name && !self.changed.swap(true, Ordering::SeqCst) {
                self.inner.set(name, self.replacement.clone());
            }
            value
        }

        fn subscribe(&self, listener: Listener) -> Subscription {
            self.inner.subscribe(listener)
        }
    }

    fn resolver_over(store: ChangingStore) -> SettingsResolver {
        ResolverBuilder::new(MODULE_PATH)
            .defaults_loader(sample_loader())
            .importer(sample_modules())
            .overrides(store)
            .warnings(NullSink)
            .build()
            .unwrap()
    }

    #[test]
    fn change_during_resolution_is_not_cached() {
        let store = ChangingStore::new(
            MemoryOverrides::new().with("TESTS_INTEGER_SETTING", 5),
            "TESTS_INTEGER_SETTING",
            99,
        );
        let resolver = resolver_over(store);

        assert_eq!(
            resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(5)
        );
        assert_eq!(resolver.cache_stats().raw, 0);
        assert_eq!(
            resolver.get_raw("INTEGER_SETTING").unwrap(),
            SettingValue::Integer(99)
        );
        assert_eq!(resolver.cache_stats().raw, 1);
    }

    #[test]
    fn change_during_import_is_not_cached() {
        let store = ChangingStore::new(
            MemoryOverrides::new(),
            "TESTS_MODULE_SETTING",
            "tests.modules.custom_module",
        );
        let resolver = resolver_over(store);

        let first = resolver.get_module("MODULE_SETTING").unwrap();
        assert_eq!(first.path(), "tests.modules.default_module");
        assert_eq!(resolver.cache_stats().total(), 0);

        let second = resolver.get_module("MODULE_SETTING").unwrap();
        assert_eq!(second.path(), "tests.modules.custom_module");
        assert_eq!(resolver.cache_stats().modules, 1);
    }

    #[test]
    fn shared_across_threads() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_INTEGER_SETTING", 5));

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(
                            h.resolver.get_raw("INTEGER_SETTING").unwrap(),
                            SettingValue::Integer(5)
                        );
                        h.resolver.clear_caches();
                    }
                });
            }
        });
    }
}

mod source_of {
    use super::*;

    #[test]
    fn reports_override_and_default() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_INTEGER_SETTING", 5));

        assert_eq!(
            h.resolver.source_of("INTEGER_SETTING").unwrap(),
            ValueSource::Override
        );
        assert_eq!(
            h.resolver.source_of("STRING_SETTING").unwrap(),
            ValueSource::Default
        );
        assert!(matches!(
            h.resolver.source_of("UNDECLARED"),
            Err(ResolveError::NoDefault { .. })
        ));
    }

    #[test]
    fn does_not_warn_or_cache() {
        let h = Harness::new(MemoryOverrides::new().with("TESTS_DEPRECATED_SETTING", "x"));

        assert_eq!(
            h.resolver.source_of("REPLACEMENT_SETTING").unwrap(),
            ValueSource::DeprecatedOverride("DEPRECATED_SETTING".to_string())
        );
        assert!(h.warnings.is_empty());
        assert_eq!(h.resolver.cache_stats().total(), 0);
    }
}
