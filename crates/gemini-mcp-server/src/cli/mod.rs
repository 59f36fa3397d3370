// crates/gemini-mcp-server/src/cli/mod.rs
// CLI module for gemini-mcp commands

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gemini_mcp::config::GeminiConfig;
use std::path::{Path, PathBuf};
use tracing::warn;

pub mod consult;
pub mod detect;
pub mod serve;
pub mod tool;

pub use consult::{ConsultArgs, run_consult};
pub use detect::run_detect;
pub use serve::run_mcp_server;
pub use tool::run_tool;

#[derive(Parser)]
#[command(name = "gemini-mcp")]
#[command(about = "Gemini CLI second opinions as MCP tools")]
#[command(version)]
pub struct Cli {
    /// Project root holding gemini-config.json (default: current directory)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Explicit config file; must exist and parse
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio (default)
    Serve,

    /// Execute a tool directly
    Tool {
        /// Tool name (e.g. consult_gemini, gemini_status)
        #[arg(index = 1)]
        name: String,

        /// JSON arguments (e.g. '{"query": "foo"}')
        #[arg(index = 2, default_value = "{}")]
        args: String,
    },

    /// Run one consultation and print the result as JSON
    Consult {
        /// Question or topic
        #[arg(index = 1)]
        query: String,

        /// Additional context
        #[arg(long, default_value = "")]
        context: String,

        /// Send the query as-is instead of asking for a structured comparison
        #[arg(long)]
        plain: bool,

        /// Skip the rate-limit wait
        #[arg(long)]
        force: bool,
    },

    /// Report uncertainty patterns found in a piece of text
    Detect {
        /// Text to scan
        #[arg(index = 1)]
        text: String,
    },
}

impl Cli {
    pub fn project_root(&self) -> Result<PathBuf> {
        match &self.project_root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("cannot determine current directory"),
        }
    }
}

/// Load configuration and log validation warnings. Validation errors abort.
pub fn load_config(project_root: &Path, config_path: Option<&Path>) -> Result<GeminiConfig> {
    let config = GeminiConfig::load(project_root, config_path)?;

    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("invalid configuration:\n{}", validation.report());
    }

    Ok(config)
}
