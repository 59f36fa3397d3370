// crates/gemini-mcp-server/src/config/mod.rs
// Configuration: defaults, gemini-config.json, GEMINI_* overrides

pub mod env;
pub mod file;
pub mod validation;

pub use file::{CONFIG_FILE_NAME, GeminiConfig};
pub use validation::ConfigValidation;
