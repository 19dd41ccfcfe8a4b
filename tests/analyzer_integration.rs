//! Integration tests for file analysis.
//!
//! These tests run the full pipeline (read, parse, extract, assemble)
//! against the Python fixtures in testdata/.

use std::fs;
use std::path::PathBuf;

use pyoutline::analysis::{AnalysisResult, ClassInfo, FileAnalysis, Parameter};
use pyoutline::config::{AnalyzerConfig, ConstructorPolicy, ExportPolicy};
use pyoutline::{analyze_file, analyze_source};
use tempfile::TempDir;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn analyze_fixture(name: &str, config: &AnalyzerConfig) -> FileAnalysis {
    let path = testdata_path().join(name);
    match analyze_file(&path, config) {
        AnalysisResult::Success(analysis) => analysis,
        AnalysisResult::Failure(failure) => panic!("analysis of {} failed: {}", name, failure.error),
    }
}

fn user_service() -> FileAnalysis {
    analyze_fixture("user_service.py", &AnalyzerConfig::default())
}

fn class<'a>(analysis: &'a FileAnalysis, name: &str) -> &'a ClassInfo {
    analysis
        .classes
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("class {} not found", name))
}

fn param_names(params: &[Parameter]) -> Vec<&str> {
    params.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Declarations
// =============================================================================

#[test]
fn test_classes_in_source_order() {
    let analysis = user_service();
    let names: Vec<_> = analysis.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["User", "UserService"]);

    let user = class(&analysis, "User");
    assert_eq!(user.decorators, vec!["dataclass"]);
    assert_eq!(user.documentation.as_deref(), Some("A registered user."));
    assert_eq!(user.location.start_line, 16);
    assert!(user.base_classes.is_empty());
    assert!(user.is_exported);

    let service = class(&analysis, "UserService");
    assert_eq!(service.base_classes, vec!["BaseService"]);
    assert!(service.documentation.is_none());
}

#[test]
fn test_dataclass_fields_are_properties() {
    let analysis = user_service();
    let user = class(&analysis, "User");

    let props: Vec<_> = user
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.type_annotation.as_deref()))
        .collect();
    assert_eq!(
        props,
        vec![("name", Some("str")), ("email", Some("str")), ("roles", Some("List[str]"))]
    );
    assert_eq!(user.properties[0].location.start_line, 19);
    assert_eq!(user.properties[0].location.start_column, 5);
}

#[test]
fn test_constructor_strips_receiver() {
    let analysis = user_service();
    let service = class(&analysis, "UserService");

    assert_eq!(service.constructors.len(), 1);
    let ctor = &service.constructors[0];
    assert_eq!(param_names(&ctor.parameters), vec!["store", "audit"]);
    assert_eq!(ctor.parameters[0].type_annotation.as_deref(), Some("Dict[str, User]"));
    assert!(!ctor.parameters[0].is_optional);
    assert_eq!(ctor.parameters[1].type_annotation.as_deref(), Some("bool"));
    assert_eq!(ctor.parameters[1].default_value.as_deref(), Some("False"));
    assert!(ctor.parameters[1].is_optional);
    assert!(ctor.documentation.is_none());
}

#[test]
fn test_methods() {
    let analysis = user_service();
    let service = class(&analysis, "UserService");

    let names: Vec<_> = service.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["get", "sync", "normalize_email", "empty", "_helper"]);

    let get = &service.methods[0];
    assert_eq!(get.documentation.as_deref(), Some("Look up a user by id."));
    assert_eq!(get.return_type.as_deref(), Some("Optional[User]"));
    assert_eq!(param_names(&get.parameters), vec!["user_id"]);

    let sync = &service.methods[1];
    assert!(sync.is_async);
    assert_eq!(param_names(&sync.parameters), vec!["remote", "*users", "**options"]);
    assert_eq!(sync.parameters[1].type_annotation.as_deref(), Some("User"));
    assert!(sync.parameters[1].is_optional);
    assert!(sync.parameters[2].is_optional);

    let normalize = &service.methods[2];
    assert!(normalize.is_static);
    // The first declared parameter is dropped for every member, static or not.
    assert_eq!(param_names(&normalize.parameters), vec!["lower"]);
    assert_eq!(normalize.parameters[0].default_value.as_deref(), Some("True"));

    let empty = &service.methods[3];
    assert_eq!(empty.decorators, vec!["classmethod"]);
    assert!(empty.parameters.is_empty());
    assert_eq!(empty.return_type.as_deref(), Some("\"UserService\""));
}

#[test]
fn test_top_level_functions() {
    let analysis = user_service();
    let names: Vec<_> = analysis.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["create_service", "_refresh"], "methods and nested functions must not appear");

    let create = &analysis.functions[0];
    assert_eq!(
        create.documentation.as_deref(),
        Some("Build a service backed by the file at ``path``.\n\nArgs:\n    path: Where users are stored.")
    );
    assert_eq!(create.return_type.as_deref(), Some("UserService"));
    assert_eq!(create.location.start_line, 59);
    assert_eq!(create.location.start_column, 1);
    assert_eq!(create.location.end_line, 66);

    let refresh = &analysis.functions[1];
    assert!(refresh.is_async);
    assert!(refresh.is_exported);
    assert!(refresh.documentation.is_none());
}

#[test]
fn test_imports() {
    let analysis = user_service();
    let modules: Vec<_> = analysis
        .imports
        .iter()
        .map(|i| i.module_specifier.as_str())
        .collect();
    assert_eq!(
        modules,
        vec!["__future__", "logging", "os.path", "dataclasses", "typing", "json"]
    );

    let aliased = &analysis.imports[2];
    assert_eq!(aliased.imported_names, vec!["osp"]);
    assert_eq!(aliased.namespace_import.as_deref(), Some("osp"));

    let typing = &analysis.imports[4];
    assert_eq!(typing.imported_names, vec!["Dict", "List", "Optional"]);
    assert!(typing.namespace_import.is_none());
    assert!(typing.default_import.is_none());
}

#[test]
fn test_documentation_coverage() {
    let analysis = user_service();
    let doc = &analysis.documentation;

    // 2 classes + 2 functions + 6 methods + 1 constructor
    assert_eq!(doc.total_symbols, 11);
    assert_eq!(doc.documented_symbols, 4);
    assert!(doc.has_documentation);
    assert!((doc.coverage - 400.0 / 11.0).abs() < 1e-9);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_naming_convention_config() {
    let config = AnalyzerConfig::parse_file(testdata_path().join("naming-convention.yaml")).unwrap();
    assert_eq!(config.exports, ExportPolicy::NamingConvention);
    assert_eq!(config.constructors, ConstructorPolicy::Last);

    let analysis = analyze_fixture("user_service.py", &config);
    let exported: Vec<_> = analysis
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f.is_exported))
        .collect();
    assert_eq!(exported, vec![("create_service", true), ("_refresh", false)]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_malformed_source() {
    let path = testdata_path().join("malformed.py");
    let result = analyze_file(&path, &AnalyzerConfig::default());

    assert!(!result.is_success());
    assert_eq!(result.path(), path.to_string_lossy());
    let error = result.error().unwrap();
    assert!(error.starts_with("Syntax error: "), "got {}", error);
    assert!(error.contains("malformed.py"), "got {}", error);
}

#[test]
fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("gone.py");
    let result = analyze_file(&path, &AnalyzerConfig::default());

    let expected = format!("File not found: {}", path.display());
    assert_eq!(result.error(), Some(expected.as_str()));
    assert_eq!(result.path(), path.to_string_lossy());
}

#[test]
fn test_non_utf8_file_is_read_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("latin1.py");
    fs::write(&path, b"x = '\xe9'\n").unwrap();

    let result = analyze_file(&path, &AnalyzerConfig::default());
    assert!(result.error().unwrap().starts_with("Error reading file: "));
}

#[test]
fn test_empty_file() {
    let analysis = analyze_fixture("empty.py", &AnalyzerConfig::default());
    assert!(analysis.classes.is_empty());
    assert!(analysis.functions.is_empty());
    assert!(analysis.imports.is_empty());
    assert_eq!(analysis.documentation.total_symbols, 0);
    assert_eq!(analysis.documentation.coverage, 0.0);
    assert!(!analysis.documentation.has_documentation);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_analysis_is_deterministic() {
    let path = testdata_path().join("user_service.py");
    let config = AnalyzerConfig::default();
    let first = serde_json::to_string_pretty(&analyze_file(&path, &config)).unwrap();
    let second = serde_json::to_string_pretty(&analyze_file(&path, &config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_coverage_bounds() {
    let sources = [
        "",
        "def f():\n    pass\n",
        "class A:\n    '''Doc.'''\n",
        "class A:\n    def __init__(self):\n        '''Init.'''\n",
    ];
    for source in sources {
        let result = analyze_source("bounds.py", source, &AnalyzerConfig::default());
        let AnalysisResult::Success(analysis) = result else {
            panic!("expected success for {:?}", source);
        };
        let doc = analysis.documentation;
        assert!(doc.documented_symbols <= doc.total_symbols);
        assert!((0.0..=100.0).contains(&doc.coverage));
        if doc.total_symbols == 0 {
            assert_eq!(doc.coverage, 0.0);
        }
    }
}
