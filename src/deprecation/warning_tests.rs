//! Tests for warning categories and sinks.

use std::sync::Arc;

use super::{
    DeprecationWarning, NullSink, TracingSink, WarningCategory, WarningKind, WarningLog,
    WarningSink,
};

fn sample(setting_name: &str) -> DeprecationWarning {
    DeprecationWarning {
        kind: WarningKind::AttributeReferenced,
        category: WarningCategory::Deprecated,
        setting_name: setting_name.to_string(),
        replacement_name: None,
        message: format!("{setting_name} is deprecated."),
    }
}

mod category {
    use super::*;

    #[test]
    fn deprecated_is_imminent() {
        assert!(WarningCategory::Deprecated.is_imminent());
        assert_eq!(
            WarningCategory::Deprecated.removed_in_text(),
            "the next version"
        );
    }

    #[test]
    fn pending_is_two_versions_away() {
        assert!(!WarningCategory::Pending.is_imminent());
        assert_eq!(WarningCategory::Pending.removed_in_text(), "two versions time");
    }

    #[test]
    fn default_is_deprecated() {
        assert_eq!(WarningCategory::default(), WarningCategory::Deprecated);
    }

    #[test]
    fn deserializes_from_lowercase_names() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            category: WarningCategory,
        }

        let pending: Wrapper = toml::from_str(r#"category = "pending""#).unwrap();
        let alias: Wrapper = toml::from_str(r#"category = "pending-deprecation""#).unwrap();
        let deprecated: Wrapper = toml::from_str(r#"category = "deprecated""#).unwrap();

        assert_eq!(pending.category, WarningCategory::Pending);
        assert_eq!(alias.category, WarningCategory::Pending);
        assert_eq!(deprecated.category, WarningCategory::Deprecated);
    }
}

mod sinks {
    use super::*;

    #[test]
    fn log_keeps_warnings_in_order() {
        let log = WarningLog::new();
        log.emit(sample("A"));
        log.emit(sample("B"));

        let names: Vec<String> = log.warnings().into_iter().map(|w| w.setting_name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn take_drains_the_log() {
        let log = WarningLog::new();
        log.emit(sample("A"));

        assert_eq!(log.take().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn shared_log_receives_through_arc() {
        let log = Arc::new(WarningLog::new());
        let sink: Arc<dyn WarningSink> = log.clone();

        sink.emit(sample("A"));

        assert_eq!(log.len(), 1);
    }

    #[test]
    fn null_and_tracing_sinks_accept_warnings() {
        NullSink.emit(sample("A"));
        TracingSink.emit(sample("B"));
    }
}

#[test]
fn display_prefixes_category() {
    assert_eq!(
        sample("A").to_string(),
        "DeprecationWarning: A is deprecated."
    );
}
