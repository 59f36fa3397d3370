// crates/gemini-mcp-server/src/tools/status.rs
// gemini_status and toggle_gemini_auto_consult tools

use super::ToolContext;

fn yes_no(flag: bool) -> &'static str {
    if flag { "✅ Yes" } else { "❌ No" }
}

/// Multi-line snapshot of configuration and statistics
pub async fn gemini_status<C: ToolContext>(ctx: &C) -> Result<String, String> {
    let status = ctx.gemini().status();

    let mut lines = vec![
        "🤖 **Gemini Integration Status**".to_string(),
        String::new(),
        format!("• **Enabled**: {}", yes_no(status.enabled)),
        format!("• **Auto-consult**: {}", yes_no(status.auto_consult)),
        format!("• **CLI Command**: `{}`", status.cli_command),
        format!("• **Model**: {}", status.model),
        format!("• **Rate Limit**: {:?}s between calls", status.rate_limit_delay),
        format!("• **Timeout**: {}s", status.timeout),
        String::new(),
        "📊 **Statistics**:".to_string(),
        format!("• **Total Consultations**: {}", status.total_consultations),
    ];

    if let Some(last) = status.last_consultation {
        lines.push(format!("• **Last Consultation**: {}", last));
    }

    Ok(lines.join("\n"))
}

/// Set auto-consultation to `enable`, or flip it when `enable` is absent
pub async fn toggle_auto_consult<C: ToolContext>(
    ctx: &C,
    enable: Option<bool>,
) -> Result<String, String> {
    let gemini = ctx.gemini();
    let state = match enable {
        Some(value) => {
            gemini.set_auto_consult(value);
            value
        }
        None => gemini.toggle_auto_consult(),
    };

    let label = if state { "enabled" } else { "disabled" };
    Ok(format!("🔄 Auto-consultation has been **{}**", label))
}
