// crates/gemini-mcp-server/src/cli/serve.rs
// MCP server initialization and main loop

use super::load_config;
use anyhow::Result;
use gemini_mcp::gemini::GeminiIntegration;
use gemini_mcp::mcp::GeminiServer;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Build the server around a freshly constructed orchestrator
pub fn setup_server(project_root: &Path, config_path: Option<&Path>) -> Result<GeminiServer> {
    let config = load_config(project_root, config_path)?;

    info!(
        enabled = config.enabled,
        auto_consult = config.auto_consult,
        cli_command = %config.cli_command,
        model = %config.model,
        "Gemini integration configured"
    );

    let gemini = Arc::new(GeminiIntegration::new(config));
    Ok(GeminiServer::new(gemini))
}

/// Serve MCP over stdio until the client disconnects
pub async fn run_mcp_server(project_root: &Path, config_path: Option<&Path>) -> Result<()> {
    let server = setup_server(project_root, config_path)?;

    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}
