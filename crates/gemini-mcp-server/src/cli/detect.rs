// crates/gemini-mcp-server/src/cli/detect.rs
// Uncertainty detection from the command line

use super::load_config;
use anyhow::Result;
use gemini_mcp::gemini::GeminiIntegration;
use std::path::Path;

/// Print pattern matches for `text` and whether auto-consult would fire
pub fn run_detect(project_root: &Path, config_path: Option<&Path>, text: &str) -> Result<()> {
    let config = load_config(project_root, config_path)?;
    let gemini = GeminiIntegration::new(config);

    print!("{}", render(&gemini, text));
    Ok(())
}

fn render(gemini: &GeminiIntegration, text: &str) -> String {
    let (found, labels) = gemini.detect_uncertainty(text);
    if !found {
        return "No uncertainty patterns found\n".to_string();
    }

    let mut out = format!("Matched {} pattern(s):\n", labels.len());
    for label in &labels {
        out.push_str(&format!("  - {}\n", label));
    }

    let triggers = gemini.auto_consult_triggers(text);
    if triggers.is_empty() {
        out.push_str("Auto-consult: off (no consultation would be triggered)\n");
    } else {
        out.push_str("Auto-consult: on (a consultation would be triggered)\n");
    }
    out
}
