// crates/gemini-mcp-server/src/config/file.rs
// File-based configuration from <project-root>/gemini-config.json

use crate::error::{GeminiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Conventional config file name, looked up in the project root
pub const CONFIG_FILE_NAME: &str = "gemini-config.json";

/// Flat integration settings. Every key falls back to its default on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Master switch; when false every consultation short-circuits
    pub enabled: bool,
    /// Whether detected uncertainty should trigger a consultation
    pub auto_consult: bool,
    /// Executable invoked for each consultation
    pub cli_command: String,
    /// Seconds the CLI may run before it is killed
    pub timeout: u64,
    /// Minimum seconds between two non-forced consultations
    pub rate_limit_delay: f64,
    /// Context longer than this many characters is truncated
    pub max_context_length: usize,
    /// Model passed with `-m`; empty omits the flag
    pub model: String,
    /// Record successful consultations in the in-memory history
    pub log_consultations: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_consult: true,
            cli_command: "gemini".to_string(),
            timeout: 60,
            rate_limit_delay: 2.0,
            max_context_length: 4000,
            model: "gemini-2.5-flash".to_string(),
            log_consultations: true,
        }
    }
}

impl GeminiConfig {
    /// Load configuration for a project: defaults, then the JSON file, then
    /// environment overrides.
    ///
    /// An explicit `config_path` must exist and parse. The conventional
    /// `<project_root>/gemini-config.json` is optional and a broken one is
    /// logged and skipped.
    pub fn load(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_file(&project_root.join(CONFIG_FILE_NAME)),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file, failing on I/O or JSON errors
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            GeminiError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&contents)
            .map_err(|e| GeminiError::Config(format!("invalid {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config from file");
        Ok(config)
    }

    /// Parse a JSON document into a config
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn from_default_file(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse config file");
                Self::default()
            }
        }
    }
}
