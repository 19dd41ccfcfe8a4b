//! Language-specific analyzer implementations.

mod python;

pub use python::PythonAnalyzer;

use once_cell::sync::OnceCell;

/// Static storage for Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// The shared Python analyzer, created on first use.
pub fn python_analyzer() -> &'static PythonAnalyzer {
    PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new)
}
