//! pyoutline - structural outline of Python source files.
//!
//! Parses one Python file with tree-sitter and reports its classes,
//! methods, constructors, annotated properties, top-level functions and
//! imports, together with a documentation coverage summary. The output is a
//! JSON record meant for documentation and code-intelligence pipelines.
//!
//! # Architecture
//!
//! - `analysis`: parser adapter, declaration extractor, coverage and the
//!   output records
//! - `config`: optional YAML policy file
//! - `cli`: the `pyoutline` command
//!
//! # Example
//!
//! ```no_run
//! use pyoutline::{analyze_file, AnalyzerConfig};
//!
//! let result = analyze_file("service.py", &AnalyzerConfig::default());
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! ```

pub mod analysis;
pub mod cli;
pub mod config;

pub use analysis::{
    analyze_file, analyze_source, AnalysisError, AnalysisResult, ClassInfo,
    FileAnalysis, FunctionInfo, ImportInfo, LanguageAnalyzer, Location, PythonAnalyzer,
};
pub use config::AnalyzerConfig;
