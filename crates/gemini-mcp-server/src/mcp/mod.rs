// crates/gemini-mcp-server/src/mcp/mod.rs
// MCP Server implementation

mod handler;
pub mod requests;

use crate::gemini::GeminiIntegration;
use crate::tools::{self, McpToolInfo, ToolContext};
use requests::{ConsultGeminiRequest, ToggleAutoConsultRequest};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    tool, tool_router,
};
use std::sync::Arc;

/// MCP Server state
#[derive(Clone)]
pub struct GeminiServer {
    pub gemini: Arc<GeminiIntegration>,
    tool_router: ToolRouter<Self>,
}

impl GeminiServer {
    pub fn new(gemini: Arc<GeminiIntegration>) -> Self {
        Self {
            gemini,
            tool_router: Self::tool_router(),
        }
    }

    /// Descriptors of every advertised tool. Fixed for the life of the server.
    pub fn list_operations(&self) -> Vec<McpToolInfo> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| McpToolInfo {
                name: t.name.to_string(),
                description: t.description.as_deref().unwrap_or("").to_string(),
                input_schema: serde_json::Value::Object((*t.input_schema).clone()),
            })
            .collect()
    }

    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }
}

impl ToolContext for GeminiServer {
    fn gemini(&self) -> &Arc<GeminiIntegration> {
        &self.gemini
    }
}

#[tool_router]
impl GeminiServer {
    #[tool(description = "Consult Gemini for a second opinion or validation")]
    async fn consult_gemini(
        &self,
        Parameters(req): Parameters<ConsultGeminiRequest>,
    ) -> Result<String, String> {
        tools::consult_gemini(self, req.query, req.context, req.comparison_mode).await
    }

    #[tool(description = "Check Gemini integration status and statistics")]
    async fn gemini_status(&self) -> Result<String, String> {
        tools::gemini_status(self).await
    }

    #[tool(description = "Enable or disable automatic Gemini consultation")]
    async fn toggle_gemini_auto_consult(
        &self,
        Parameters(req): Parameters<ToggleAutoConsultRequest>,
    ) -> Result<String, String> {
        tools::toggle_auto_consult(self, req.enable).await
    }
}
