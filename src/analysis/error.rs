//! Error kinds produced while analyzing a single file.
//!
//! Every variant is recoverable: the entry points in `analysis` turn it into
//! an `{error, path}` record instead of aborting. The `Display` strings are
//! part of the output contract.

use thiserror::Error;

/// Errors that can occur while analyzing a file.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The input path does not exist.
    #[error("File not found: {0}")]
    NotFound(String),
    /// The file exists but could not be read as UTF-8 text.
    #[error("Error reading file: {0}")]
    Read(#[source] std::io::Error),
    /// The source text does not parse.
    #[error("Syntax error: {0}")]
    Syntax(String),
    /// Any other failure during parsing setup or traversal.
    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl AnalysisError {
    /// Shorthand for an unexpected failure during traversal.
    pub fn analysis(msg: impl Into<String>) -> Self {
        AnalysisError::Analysis(msg.into())
    }

    /// Classify an I/O failure that happened while reading `path`.
    pub fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AnalysisError::NotFound(path.to_string()),
            _ => AnalysisError::Read(err),
        }
    }
}

impl From<tree_sitter::LanguageError> for AnalysisError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        AnalysisError::Analysis(err.to_string())
    }
}
