// crates/gemini-mcp-server/src/config/env.rs
// Environment overrides - GEMINI_* variables win over the config file

use super::GeminiConfig;
use std::str::FromStr;
use tracing::{debug, warn};

pub const ENV_ENABLED: &str = "GEMINI_ENABLED";
pub const ENV_AUTO_CONSULT: &str = "GEMINI_AUTO_CONSULT";
pub const ENV_CLI_COMMAND: &str = "GEMINI_CLI_COMMAND";
pub const ENV_TIMEOUT: &str = "GEMINI_TIMEOUT";
pub const ENV_RATE_LIMIT: &str = "GEMINI_RATE_LIMIT";
pub const ENV_MODEL: &str = "GEMINI_MODEL";
pub const ENV_MAX_CONTEXT_LENGTH: &str = "GEMINI_MAX_CONTEXT_LENGTH";
pub const ENV_LOG_CONSULTATIONS: &str = "GEMINI_LOG_CONSULTATIONS";

impl GeminiConfig {
    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// Values that fail to parse are logged and skipped; the previous value
    /// is kept.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = Vec::new();

        if let Some(v) = read_bool(&lookup, ENV_ENABLED) {
            self.enabled = v;
            applied.push(ENV_ENABLED);
        }
        if let Some(v) = read_bool(&lookup, ENV_AUTO_CONSULT) {
            self.auto_consult = v;
            applied.push(ENV_AUTO_CONSULT);
        }
        if let Some(v) = read_string(&lookup, ENV_CLI_COMMAND) {
            self.cli_command = v;
            applied.push(ENV_CLI_COMMAND);
        }
        if let Some(v) = read_parsed(&lookup, ENV_TIMEOUT) {
            self.timeout = v;
            applied.push(ENV_TIMEOUT);
        }
        if let Some(v) = read_parsed(&lookup, ENV_RATE_LIMIT) {
            self.rate_limit_delay = v;
            applied.push(ENV_RATE_LIMIT);
        }
        if let Some(v) = read_string(&lookup, ENV_MODEL) {
            self.model = v;
            applied.push(ENV_MODEL);
        }
        if let Some(v) = read_parsed(&lookup, ENV_MAX_CONTEXT_LENGTH) {
            self.max_context_length = v;
            applied.push(ENV_MAX_CONTEXT_LENGTH);
        }
        if let Some(v) = read_bool(&lookup, ENV_LOG_CONSULTATIONS) {
            self.log_consultations = v;
            applied.push(ENV_LOG_CONSULTATIONS);
        }

        if !applied.is_empty() {
            debug!(vars = ?applied, "Applied environment overrides");
        }
    }
}

fn read_string<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn read_parsed<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

fn read_bool<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<bool> {
    let raw = lookup(name)?;
    let parsed = parse_bool(&raw);
    if parsed.is_none() {
        warn!(var = name, value = %raw, "Ignoring unparseable boolean override");
    }
    parsed
}

/// Parse the usual spellings of a boolean flag
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
