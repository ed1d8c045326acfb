//! Tests for dotted-path imports.

use std::sync::Arc;

use super::{ImportError, Importer, Module, ModuleTable, Object, is_dotted_path};

#[derive(Debug, PartialEq, Eq)]
struct DefaultClass;

mod paths {
    use super::*;

    #[test]
    fn accepts_absolute_dotted_paths() {
        assert!(is_dotted_path("project"));
        assert!(is_dotted_path("project.app.module"));
        assert!(is_dotted_path("_private.mod_2"));
    }

    #[test]
    fn rejects_relative_or_malformed_paths() {
        assert!(!is_dotted_path(""));
        assert!(!is_dotted_path(".relative"));
        assert!(!is_dotted_path("trailing."));
        assert!(!is_dotted_path("double..dot"));
        assert!(!is_dotted_path("1starts.with_digit"));
        assert!(!is_dotted_path("has space"));
    }
}

mod module {
    use super::*;

    #[test]
    fn attributes_are_retrievable_by_name() {
        let module = Module::new("tests.classes").with_attr("DefaultClass", DefaultClass);

        let object = module.attr("DefaultClass").unwrap();
        assert_eq!(object.downcast_ref::<DefaultClass>(), Some(&DefaultClass));
        assert!(module.attr("Missing").is_none());
        assert_eq!(module.attribute_names().collect::<Vec<_>>(), vec!["DefaultClass"]);
    }

    #[test]
    fn shared_objects_keep_identity() {
        let shared: Object = Arc::new(DefaultClass);
        let module = Module::new("m").with_object("X", shared.clone());

        assert!(Arc::ptr_eq(&module.attr("X").unwrap(), &shared));
    }
}

mod table {
    use super::*;

    #[test]
    fn imports_registered_module() {
        let table = ModuleTable::new().with(Module::new("tests.modules.default_module"));

        let module = table.import_module("tests.modules.default_module").unwrap();
        assert_eq!(module.path(), "tests.modules.default_module");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn unknown_module_is_not_found() {
        let result = ModuleTable::new().import_module("project.app.module");

        assert_eq!(
            result.unwrap_err(),
            ImportError::NotFound {
                path: "project.app.module".to_string()
            }
        );
    }

    #[test]
    fn malformed_path_is_invalid() {
        let result = ModuleTable::new().import_module("not a path");

        assert!(matches!(result, Err(ImportError::InvalidPath { .. })));
    }

    #[test]
    fn repeated_imports_share_the_module() {
        let table = ModuleTable::new().with(Module::new("a.b"));

        let first = table.import_module("a.b").unwrap();
        let second = table.import_module("a.b").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
    }
}
