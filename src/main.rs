use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use session_crud_api::config::{self, Environment};
use session_crud_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "session-crud-api")]
#[command(about = "Session-gated CRUD API with Google/Facebook login")]
#[command(version)]
struct Args {
    #[arg(long, help = "Address to bind (overrides HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up FRONTEND_URL, GOOGLE_CLIENT_ID, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Starting in {:?} mode", config.environment);
    if config.uses_default_secret() && config.environment != Environment::Development {
        tracing::warn!("SESSION_SECRET is not set; sessions are signed with the default secret");
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::from_config(config).context("failed to initialise OAuth providers")?;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}
