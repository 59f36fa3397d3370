// crates/gemini-mcp-server/src/tools/consult.rs
// consult_gemini tool

use super::ToolContext;
use crate::error::GeminiError;
use crate::gemini::ConsultationResult;

/// Ask Gemini for a second opinion on `query`.
///
/// An empty or missing query is rejected before the orchestrator is touched.
/// `comparison_mode` defaults to true.
pub async fn consult_gemini<C: ToolContext>(
    ctx: &C,
    query: Option<String>,
    context: Option<String>,
    comparison_mode: Option<bool>,
) -> Result<String, String> {
    let query = match query {
        Some(q) if !q.is_empty() => q,
        _ => {
            return Err(GeminiError::InvalidInput(
                "'query' parameter is required for Gemini consultation".to_string(),
            )
            .into());
        }
    };
    let context = context.unwrap_or_default();
    let comparison_mode = comparison_mode.unwrap_or(true);

    let result = ctx
        .gemini()
        .consult(&query, &context, comparison_mode, false)
        .await;

    match result {
        ConsultationResult::Success {
            response,
            execution_time,
            ..
        } => Ok(format!(
            "🤖 **Gemini Second Opinion**\n\n{}\n\n⏱️ *Consultation completed in {:.2}s*",
            response, execution_time
        )),
        ConsultationResult::Error { error, .. } => Err(failure_text(&error)),
        ConsultationResult::Disabled { message } => Err(failure_text(&message)),
    }
}

fn failure_text(error: &str) -> String {
    format!("❌ **Gemini Consultation Failed**\n\nError: {}", error)
}
