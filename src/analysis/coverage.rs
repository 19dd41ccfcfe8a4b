//! Documentation coverage over the documentable symbols of a file.

use super::{ClassInfo, DocumentationCoverage, FunctionInfo};

fn is_documented(doc: &Option<String>) -> bool {
    doc.as_deref().is_some_and(|d| !d.is_empty())
}

/// Compute coverage for classes, top-level functions, methods and
/// constructors. Each symbol is judged by its own docstring only;
/// properties and imports never count.
pub fn calculate(classes: &[ClassInfo], functions: &[FunctionInfo]) -> DocumentationCoverage {
    let mut total = 0usize;
    let mut documented = 0usize;

    let mut count = |doc: &Option<String>| {
        total += 1;
        if is_documented(doc) {
            documented += 1;
        }
    };

    for class in classes {
        count(&class.documentation);
        for method in &class.methods {
            count(&method.documentation);
        }
        for ctor in &class.constructors {
            count(&ctor.documentation);
        }
    }
    for func in functions {
        count(&func.documentation);
    }

    let coverage = if total > 0 {
        documented as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    DocumentationCoverage {
        has_documentation: documented > 0,
        documented_symbols: documented,
        total_symbols: total,
        coverage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Constructor, Location, Method, Property};

    fn loc() -> Location {
        Location {
            start_line: 1,
            start_column: 1,
            end_line: 1,
            end_column: 1,
        }
    }

    fn class(doc: Option<&str>) -> ClassInfo {
        ClassInfo {
            name: "C".to_string(),
            documentation: doc.map(String::from),
            is_exported: true,
            location: loc(),
            decorators: vec![],
            base_classes: vec![],
            methods: vec![],
            properties: vec![],
            constructors: vec![],
        }
    }

    fn method(doc: Option<&str>) -> Method {
        Method {
            name: "m".to_string(),
            documentation: doc.map(String::from),
            location: loc(),
            is_static: false,
            is_async: false,
            decorators: vec![],
            parameters: vec![],
            return_type: None,
        }
    }

    fn function(doc: Option<&str>) -> FunctionInfo {
        FunctionInfo {
            name: "f".to_string(),
            documentation: doc.map(String::from),
            is_exported: true,
            is_async: false,
            decorators: vec![],
            location: loc(),
            parameters: vec![],
            return_type: None,
        }
    }

    #[test]
    fn test_empty_is_zero_without_division() {
        let cov = calculate(&[], &[]);
        assert_eq!(cov.total_symbols, 0);
        assert_eq!(cov.documented_symbols, 0);
        assert_eq!(cov.coverage, 0.0);
        assert!(!cov.has_documentation);
    }

    #[test]
    fn test_each_symbol_judged_independently() {
        let mut c = class(None);
        c.methods.push(method(Some("Does things.")));
        c.constructors.push(Constructor {
            documentation: None,
            location: loc(),
            parameters: vec![],
        });
        c.properties.push(Property {
            name: "p".to_string(),
            type_annotation: Some("int".to_string()),
            location: loc(),
        });

        let cov = calculate(&[c], &[]);
        assert_eq!(cov.total_symbols, 3);
        assert_eq!(cov.documented_symbols, 1);
        assert!(cov.has_documentation);
        assert!((cov.coverage - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_docstring_does_not_count() {
        let cov = calculate(&[], &[function(Some("")), function(Some("Yes."))]);
        assert_eq!(cov.total_symbols, 2);
        assert_eq!(cov.documented_symbols, 1);
        assert_eq!(cov.coverage, 50.0);
    }

    #[test]
    fn test_fully_documented() {
        let mut c = class(Some("A class."));
        c.methods.push(method(Some("A method.")));
        let cov = calculate(&[c], &[function(Some("A function."))]);
        assert_eq!(cov.total_symbols, 3);
        assert_eq!(cov.documented_symbols, 3);
        assert_eq!(cov.coverage, 100.0);
    }
}
