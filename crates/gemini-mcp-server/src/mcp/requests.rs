// crates/gemini-mcp-server/src/mcp/requests.rs
// MCP tool request types

use rmcp::schemars;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ConsultGeminiRequest {
    // Missing or empty values are rejected by tools::consult_gemini
    #[schemars(required, description = "The question or topic to consult Gemini about")]
    pub query: Option<String>,
    #[schemars(description = "Additional context for the consultation")]
    pub context: Option<String>,
    #[serde(alias = "comparisonMode")]
    #[schemars(description = "Whether to request structured comparison format (default: true)")]
    pub comparison_mode: Option<bool>,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ToggleAutoConsultRequest {
    #[schemars(description = "Enable (true) or disable (false) auto-consultation; omit to flip")]
    pub enable: Option<bool>,
}
