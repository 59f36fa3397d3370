// crates/gemini-mcp-server/src/error.rs
// Error types for Gemini consultations

use thiserror::Error;

/// Main error type for the consultation library
#[derive(Error, Debug)]
pub enum GeminiError {
    /// A tool argument failed validation before any consultation started
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The CLI exited non-zero. The message is the captured stderr,
    /// possibly followed by an authentication hint.
    #[error("Gemini CLI failed: {0}")]
    Execution(String),

    #[error("Gemini CLI timed out after {0} seconds")]
    Timeout(u64),

    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Result using GeminiError
pub type Result<T> = std::result::Result<T, GeminiError>;

impl GeminiError {
    /// Convert to user-facing string for MCP tool boundaries
    pub fn to_user_string(&self) -> String {
        match self {
            GeminiError::InvalidInput(msg) => format!("❌ Error: {}", msg),
            other => other.to_string(),
        }
    }
}

impl From<GeminiError> for String {
    fn from(err: GeminiError) -> Self {
        err.to_user_string()
    }
}
