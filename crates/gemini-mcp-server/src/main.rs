// crates/gemini-mcp-server/src/main.rs
// gemini-mcp - Gemini second opinions over MCP

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".gemini-mcp/.env"));
    }
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // stdout carries the protocol when serving, so keep stderr quiet too
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        match &cli.command {
            Some(Commands::Serve) | None => Level::WARN,
            Some(Commands::Tool { .. })
            | Some(Commands::Consult { .. })
            | Some(Commands::Detect { .. }) => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let project_root = cli.project_root()?;
    let config_path = cli.config.as_deref();

    match cli.command {
        None | Some(Commands::Serve) => {
            cli::run_mcp_server(&project_root, config_path).await?;
        }
        Some(Commands::Tool { name, args }) => {
            cli::run_tool(&project_root, config_path, name, args).await?;
        }
        Some(Commands::Consult {
            query,
            context,
            plain,
            force,
        }) => {
            let args = cli::ConsultArgs {
                query,
                context,
                comparison_mode: !plain,
                force,
            };
            cli::run_consult(&project_root, config_path, args).await?;
        }
        Some(Commands::Detect { text }) => {
            cli::run_detect(&project_root, config_path, &text)?;
        }
    }

    Ok(())
}
