use anyhow::Context;
use favro_mcp_server::{Config, FavroMcpServer};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Write to stderr to keep stdout clean for MCP JSON protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "favro_mcp_server=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .init();

    info!("Starting Favro MCP Server");

    // Env vars first, then config file
    let config = Config::from_env_or_file().context("Failed to load configuration")?;
    info!(
        api_url = %config.api_url,
        organization_id = ?config.organization_id,
        board_id = ?config.board_id,
        "Configuration loaded"
    );

    let mcp_server = FavroMcpServer::from_config(&config)?;

    let service = mcp_server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
