//! Operation handlers behind the MCP tools.
//!
//! Every handler takes `&impl ToolContext` and returns `Result<String, String>`.
//! `Ok` and `Err` both carry display text; `Err` marks the call as failed.

mod consult;
mod status;

pub use consult::consult_gemini;
pub use status::{gemini_status, toggle_auto_consult};

use crate::gemini::GeminiIntegration;
use std::sync::Arc;

/// Name and description of an advertised tool
#[derive(Debug, Clone, PartialEq)]
pub struct McpToolInfo {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's arguments
    pub input_schema: serde_json::Value,
}

/// Common context required by all tools.
/// Implemented by GeminiServer (MCP) and by test doubles.
pub trait ToolContext: Send + Sync {
    /// The shared consultation orchestrator
    fn gemini(&self) -> &Arc<GeminiIntegration>;
}
