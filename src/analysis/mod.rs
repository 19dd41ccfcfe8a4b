//! AST-backed structural analysis of Python source files.
//!
//! One file in, one [`AnalysisResult`] out. The result lists the file's
//! classes (with methods, constructors and annotated properties), top-level
//! functions, imports and a documentation coverage summary.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────────┐     ┌─────────────┐
//! │ Source text │────▶│ Parser adapter │────▶│ ParsedFile  │
//! └─────────────┘     │ (tree-sitter)  │     └─────────────┘
//!                     └────────────────┘            │
//!                                                   ▼
//! ┌──────────────┐    ┌────────────────┐     ┌─────────────┐
//! │AnalysisResult│◀───│ Assembler +    │◀────│ Extractor   │
//! └──────────────┘    │ coverage       │     │ (Outline)   │
//!                     └────────────────┘     └─────────────┘
//! ```
//!
//! Every failure (missing file, unreadable file, syntax error, unexpected
//! tree shape) is reported as an `{error, path}` record; no partial results
//! are returned.

mod coverage;
mod error;
mod facts;
mod languages;
mod traits;

pub use coverage::calculate as calculate_coverage;
pub use error::AnalysisError;
pub use facts::{
    AnalysisFailure, AnalysisResult, ClassInfo, Constructor, DocumentationCoverage, FileAnalysis,
    FunctionInfo, ImportInfo, Location, Method, Parameter, Property, RawSpan, Reserved,
};
pub use languages::{python_analyzer, PythonAnalyzer};
pub use traits::{LanguageAnalyzer, Outline, ParsedFile};

use std::fs;
use std::path::Path;

use crate::config::AnalyzerConfig;

/// Byte order mark some editors put at the start of UTF-8 files.
const UTF8_BOM: char = '\u{feff}';

/// Analyze a Python file on disk.
///
/// The path is echoed back verbatim in the result, whatever the outcome.
pub fn analyze_file<P: AsRef<Path>>(path: P, config: &AnalyzerConfig) -> AnalysisResult {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().into_owned();

    match fs::read_to_string(path) {
        Ok(source) => analyze_source(&path_str, &source, config),
        Err(err) => {
            let err = AnalysisError::from_io(&path_str, err);
            tracing::debug!(path = %path_str, error = %err, "could not read source");
            failure(path_str, err)
        }
    }
}

/// Analyze source text that has already been read.
pub fn analyze_source(path: &str, source: &str, config: &AnalyzerConfig) -> AnalysisResult {
    match analyze(python_analyzer(), path, source, config) {
        Ok(analysis) => AnalysisResult::Success(analysis),
        Err(err) => failure(path.to_string(), err),
    }
}

fn analyze(
    analyzer: &dyn LanguageAnalyzer,
    path: &str,
    source: &str,
    config: &AnalyzerConfig,
) -> Result<FileAnalysis, AnalysisError> {
    let source = source.strip_prefix(UTF8_BOM).unwrap_or(source);
    tracing::debug!(path, language = analyzer.language_id(), "analyzing");
    let parsed = analyzer.parse(path, source)?;
    let outline = analyzer.extract(&parsed, config)?;
    Ok(assemble(path, outline))
}

/// Package extracted declarations into the success record.
fn assemble(path: &str, outline: Outline) -> FileAnalysis {
    let documentation = coverage::calculate(&outline.classes, &outline.functions);
    FileAnalysis {
        path: path.to_string(),
        classes: outline.classes,
        functions: outline.functions,
        interfaces: Vec::new(),
        enums: Vec::new(),
        type_aliases: Vec::new(),
        imports: outline.imports,
        exports: Vec::new(),
        documentation,
    }
}

fn failure(path: String, err: AnalysisError) -> AnalysisResult {
    AnalysisResult::Failure(AnalysisFailure {
        error: err.to_string(),
        path,
    })
}
