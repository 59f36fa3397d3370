// crates/gemini-mcp-server/src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::setup_server;
use anyhow::Result;
use gemini_mcp::mcp::GeminiServer;
use gemini_mcp::mcp::requests::{ConsultGeminiRequest, ToggleAutoConsultRequest};
use std::path::Path;

/// Execute a tool directly from the command line
pub async fn run_tool(
    project_root: &Path,
    config_path: Option<&Path>,
    name: String,
    args: String,
) -> Result<()> {
    let server = setup_server(project_root, config_path)?;

    match dispatch(&server, &name, &args).await? {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            anyhow::bail!("tool '{}' failed", name)
        }
    }
}

/// Route a tool name and JSON arguments to its handler.
///
/// The outer `Result` fails on bad JSON; the inner one is the tool's own outcome.
pub async fn dispatch(
    server: &GeminiServer,
    name: &str,
    args: &str,
) -> Result<Result<String, String>> {
    let res = match name {
        "consult_gemini" => {
            let req: ConsultGeminiRequest = serde_json::from_str(args)?;
            gemini_mcp::tools::consult_gemini(server, req.query, req.context, req.comparison_mode)
                .await
        }
        "gemini_status" => gemini_mcp::tools::gemini_status(server).await,
        "toggle_gemini_auto_consult" => {
            let req: ToggleAutoConsultRequest = serde_json::from_str(args)?;
            gemini_mcp::tools::toggle_auto_consult(server, req.enable).await
        }
        _ => Err(format!("Unknown tool: {}", name)),
    };
    Ok(res)
}

/// Tool names supported by the CLI dispatcher.
/// Used for verification against the MCP router.
#[cfg(test)]
fn list_cli_tool_names() -> Vec<&'static str> {
    vec!["consult_gemini", "gemini_status", "toggle_gemini_auto_consult"]
}
