//! Command-line interface for pyoutline.

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::analysis;
use crate::config::AnalyzerConfig;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Message printed when no input file is given.
const NO_PATH_MESSAGE: &str = "No file path provided";

/// Extract the structure of a Python file as JSON.
///
/// Prints classes, methods, constructors, properties, top-level functions,
/// imports and documentation coverage. Analysis failures are reported in the
/// JSON payload, not through the exit code.
#[derive(Parser, Debug)]
#[command(name = "pyoutline")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Python source file to analyze
    pub path: Option<PathBuf>,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log traversal details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run the analysis and write the JSON result to stdout.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(path) = &cli.path else {
        writeln!(out, "{}", missing_path_record()?)?;
        return Ok(EXIT_USAGE);
    };

    let config = AnalyzerConfig::load(cli.config.as_deref(), Path::new("."))?;
    let result = analysis::analyze_file(path, &config);
    if let Some(err) = result.error() {
        tracing::debug!(path = %result.path(), error = %err, "analysis failed");
    }

    writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
    Ok(EXIT_SUCCESS)
}

/// The usage error line, written as `{"error": "..."}` with a space after
/// the colon.
fn missing_path_record() -> serde_json::Result<String> {
    Ok(format!("{{\"error\": {}}}", serde_json::to_string(NO_PATH_MESSAGE)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["pyoutline", "module.py", "-v"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("module.py")));
        assert!(cli.verbose);
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["pyoutline", "--config", "cfg.yaml", "m.py"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cfg.yaml")));
    }

    #[test]
    fn test_missing_path_record_layout() {
        let line = missing_path_record().unwrap();
        assert_eq!(line, r#"{"error": "No file path provided"}"#);
    }

    #[test]
    fn test_path_is_optional() {
        let cli = Cli::try_parse_from(["pyoutline"]).unwrap();
        assert!(cli.path.is_none());
    }
}
