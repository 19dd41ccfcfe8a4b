//! Analyzer configuration.
//!
//! Configuration is optional. When present it is a small YAML file that
//! tunes the few policy decisions the extractor has to make.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the working directory.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["pyoutline.yaml", ".pyoutline.yaml"];

/// How `isExported` is decided for top-level classes and functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExportPolicy {
    /// Every top-level declaration is exported.
    #[default]
    Conservative,
    /// A single leading underscore marks a declaration as non-public.
    /// Dunder names stay exported.
    NamingConvention,
}

impl ExportPolicy {
    pub fn is_exported(&self, name: &str) -> bool {
        match self {
            ExportPolicy::Conservative => true,
            ExportPolicy::NamingConvention => {
                !name.starts_with('_') || (name.starts_with("__") && name.ends_with("__"))
            }
        }
    }
}

/// Which `__init__` wins when a class body defines it more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConstructorPolicy {
    #[default]
    First,
    /// Matches what the interpreter binds at runtime.
    Last,
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub exports: ExportPolicy,
    #[serde(default)]
    pub constructors: ConstructorPolicy,
}

impl AnalyzerConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. An empty document yields the defaults.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AnalyzerConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load the config named explicitly, or the first default file found in
    /// `dir`, or the defaults.
    ///
    /// A broken explicit config is an error. A broken discovered config is
    /// logged and replaced by the defaults.
    pub fn load(explicit: Option<&Path>, dir: &Path) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::parse_file(path).map_err(|e| {
                anyhow::anyhow!("failed to load config {}: {}", path.display(), e)
            });
        }
        let Some(path) = discover(dir) else {
            return Ok(Self::default());
        };
        tracing::debug!(config = %path.display(), "using discovered config");
        match Self::parse_file(&path) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(
                    config = %path.display(),
                    error = %err,
                    "ignoring invalid config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }
}

/// Find a default config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
