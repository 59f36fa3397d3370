// crates/gemini-mcp-server/src/config/validation.rs
// Startup validation of the merged configuration

use super::GeminiConfig;

/// Problems found in a merged configuration. Errors stop `serve`.
#[derive(Debug, Default)]
pub struct ConfigValidation {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ConfigValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// One line per problem, errors first
    pub fn report(&self) -> String {
        if self.errors.is_empty() && self.warnings.is_empty() {
            return "Configuration OK".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("error: {}", e))
            .chain(self.warnings.iter().map(|w| format!("warning: {}", w)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl GeminiConfig {
    /// Check the merged configuration before serving
    pub fn validate(&self) -> ConfigValidation {
        let mut validation = ConfigValidation::default();

        if self.cli_command.trim().is_empty() {
            validation.errors.push("cli_command is empty; set GEMINI_CLI_COMMAND or cli_command.".into());
        }

        if !self.rate_limit_delay.is_finite() || self.rate_limit_delay < 0.0 {
            validation.errors.push(format!(
                "rate_limit_delay must be a non-negative number of seconds, got {}",
                self.rate_limit_delay
            ));
        }

        if self.timeout == 0 {
            validation.warnings.push("timeout is 0; every consultation will time out immediately.".into());
        }

        if self.max_context_length == 0 {
            validation.warnings.push("max_context_length is 0; all context will be truncated.".into());
        }

        if self.model.trim().is_empty() {
            validation.warnings.push("model is empty; the CLI default model will be used.".into());
        }

        if !self.enabled {
            validation.warnings.push("Gemini integration is disabled; consultations will be skipped.".into());
        }

        validation
    }
}
