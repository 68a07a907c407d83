//! Configuration for report export

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub report: ReportSection,
}

/// Report output settings
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Directory exported reports are written to
    pub output_dir: String,
    /// Worksheet name of the styled export
    pub sheet_name: String,
    /// Agent name used in file names when the sheet has none
    pub fallback_agent: String,
    /// File name of the JSON data export
    pub json_file_name: String,
}

impl Default for ReportSection {
    fn default() -> Self {
        Self {
            output_dir: constants::DEFAULT_OUTPUT_DIR.to_string(),
            sheet_name: constants::DEFAULT_SHEET_NAME.to_string(),
            fallback_agent: constants::DEFAULT_FALLBACK_AGENT.to_string(),
            json_file_name: constants::DEFAULT_JSON_FILENAME.to_string(),
        }
    }
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - Incorrect data types (all [report] values are strings)\n\n\
             See config.toml.example for the expected format."
        })
    }

    /// Load the file if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

// =============================================================================
// Runtime Configuration
// =============================================================================

/// Report settings with command-line overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub sheet_name: String,
    pub fallback_agent: String,
    pub json_file_name: String,
}

impl Config {
    /// Create config from file config and optional output directory override
    pub fn from_file(file_config: &FileConfig, output_dir: Option<PathBuf>) -> Self {
        let report = &file_config.report;

        Self {
            output_dir: output_dir.unwrap_or_else(|| PathBuf::from(&report.output_dir)),
            sheet_name: report.sheet_name.clone(),
            fallback_agent: report.fallback_agent.clone(),
            json_file_name: report.json_file_name.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file(&FileConfig::default(), None)
    }
}
