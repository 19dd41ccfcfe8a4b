//! Core traits for language analysis.

use super::{AnalysisError, ClassInfo, FunctionInfo, ImportInfo};
use crate::config::AnalyzerConfig;

/// Holds a parsed tree-sitter tree and associated metadata.
#[derive(Debug)]
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// The original source code (kept for node text extraction).
    pub source: String,
    /// The file path as given by the caller.
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}

/// Declarations collected by one traversal, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    pub classes: Vec<ClassInfo>,
    pub functions: Vec<FunctionInfo>,
    pub imports: Vec<ImportInfo>,
}

/// Language front end plus declaration extractor.
///
/// `parse`, `docstring` and `unparse` are the whole surface the extractor
/// needs from a grammar; `extract` walks the tree using them.
///
/// # Thread Safety
///
/// tree_sitter::Parser is not Sync, so implementations create a parser per
/// call and keep no state between files.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "python").
    fn language_id(&self) -> &'static str;

    /// Parse source text. Fails with `AnalysisError::Syntax` on malformed
    /// input; a returned tree is guaranteed error-free.
    fn parse(&self, path: &str, source: &str) -> Result<ParsedFile, AnalysisError>;

    /// Documentation string attached to a declaration node, if any.
    fn docstring(&self, parsed: &ParsedFile, node: tree_sitter::Node) -> Option<String>;

    /// Best-effort display text for an expression or annotation subtree.
    fn unparse(&self, parsed: &ParsedFile, node: tree_sitter::Node) -> String {
        parsed.node_text(node).to_string()
    }

    /// Walk the tree and collect classes, functions and imports.
    fn extract(
        &self,
        parsed: &ParsedFile,
        config: &AnalyzerConfig,
    ) -> Result<Outline, AnalysisError>;
}
