//! Output records extracted from a single file.
//!
//! Field names and order are the compatibility surface consumed by the
//! downstream documentation pipeline, so every struct serializes in
//! camelCase and optional values are emitted as `null`, never skipped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position data as handed over by the parser adapter.
///
/// Lines are 1-based, columns are raw 0-based byte offsets. The end position
/// is optional because not every front end reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSpan {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: Option<usize>,
    pub end_col: Option<usize>,
}

/// End of the last non-comment token under `node`.
///
/// tree-sitter lets a block absorb comments that trail its last statement;
/// those do not extend the statement.
fn content_end(node: tree_sitter::Node) -> tree_sitter::Point {
    let mut current = node;
    loop {
        let mut cursor = current.walk();
        let last = current
            .children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .last();
        match last {
            Some(child) => current = child,
            None => return current.end_position(),
        }
    }
}

impl RawSpan {
    /// Build a raw span from a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = content_end(node);
        Self {
            start_line: start.row + 1, // tree-sitter rows are 0-indexed
            start_col: start.column,
            end_line: Some(end.row + 1),
            end_col: Some(end.column),
        }
    }
}

/// Normalized source location, 1-based lines and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
}

impl Location {
    /// Map raw position data to a location.
    ///
    /// A missing end line reuses the start line; a missing end column
    /// collapses to a point span at the start column.
    pub fn from_raw(raw: RawSpan) -> Self {
        Self {
            start_line: raw.start_line,
            start_column: raw.start_col + 1,
            end_line: raw.end_line.unwrap_or(raw.start_line),
            end_column: raw.end_col.unwrap_or(raw.start_col) + 1,
        }
    }

    /// Location of a tree-sitter node.
    pub fn from_node(node: tree_sitter::Node) -> Self {
        Self::from_raw(RawSpan::from_node(node))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_annotation: Option<String>,
    pub is_optional: bool,
    pub default_value: Option<String>,
}

/// A method declared directly in a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub name: String,
    pub documentation: Option<String>,
    pub location: Location,
    pub is_static: bool,
    pub is_async: bool,
    pub decorators: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

/// The class initializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    pub documentation: Option<String>,
    pub location: Location,
    pub parameters: Vec<Parameter>,
}

/// A type-annotated class-level variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_annotation: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    pub documentation: Option<String>,
    pub is_exported: bool,
    pub location: Location,
    pub decorators: Vec<String>,
    pub base_classes: Vec<String>,
    pub methods: Vec<Method>,
    pub properties: Vec<Property>,
    pub constructors: Vec<Constructor>,
}

/// A module-level function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    pub documentation: Option<String>,
    pub is_exported: bool,
    pub is_async: bool,
    pub decorators: Vec<String>,
    pub location: Location,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub imported_names: Vec<String>,
    pub module_specifier: String,
    pub default_import: Option<String>,
    pub namespace_import: Option<String>,
}

/// Placeholder element for schema collections Python has no construct for
/// (interfaces, enums, type aliases, exports). It has no values, so those
/// collections are always empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reserved {}

/// Documentation coverage over classes, functions, methods and constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationCoverage {
    pub has_documentation: bool,
    pub documented_symbols: usize,
    pub total_symbols: usize,
    pub coverage: f64,
}

/// Successful analysis of one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub path: String,
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub interfaces: Vec<Reserved>,
    pub enums: Vec<Reserved>,
    pub type_aliases: Vec<Reserved>,
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<Reserved>,
    pub documentation: DocumentationCoverage,
}

/// Failed analysis of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub error: String,
    pub path: String,
}

/// Outcome of analyzing one file: exactly one of the two records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Success(FileAnalysis),
    Failure(AnalysisFailure),
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AnalysisResult::Success(_))
    }

    /// The input path, present in both variants.
    pub fn path(&self) -> &str {
        match self {
            AnalysisResult::Success(analysis) => &analysis.path,
            AnalysisResult::Failure(failure) => &failure.path,
        }
    }

    /// The error message, if analysis failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisResult::Success(_) => None,
            AnalysisResult::Failure(failure) => Some(&failure.error),
        }
    }
}
