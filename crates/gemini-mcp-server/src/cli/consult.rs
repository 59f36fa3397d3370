// crates/gemini-mcp-server/src/cli/consult.rs
// One consultation from the command line, printed as JSON

use super::load_config;
use anyhow::Result;
use gemini_mcp::gemini::{ConsultationResult, GeminiIntegration};
use std::path::Path;

/// Options for a single command-line consultation
pub struct ConsultArgs {
    pub query: String,
    pub context: String,
    pub comparison_mode: bool,
    pub force: bool,
}

/// Run one consultation and print the result. Exits non-zero unless it succeeded.
pub async fn run_consult(
    project_root: &Path,
    config_path: Option<&Path>,
    args: ConsultArgs,
) -> Result<()> {
    let config = load_config(project_root, config_path)?;
    let gemini = GeminiIntegration::new(config);

    let result = gemini
        .consult(&args.query, &args.context, args.comparison_mode, args.force)
        .await;

    println!("{}", render(&result)?);
    if !result.is_success() {
        anyhow::bail!("consultation finished with status '{}'", result.status());
    }
    Ok(())
}

fn render(result: &ConsultationResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}
