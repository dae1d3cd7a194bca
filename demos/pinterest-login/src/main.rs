use anyhow::{Context, Result};
use ras_identity_pinterest::PinterestStrategy;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod routes;

use config::AppConfig;
use routes::{AppState, router};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting Pinterest login server");

    let strategy_config = config.strategy_config()?;
    let redirect_uri = strategy_config.redirect_uri.clone();
    let strategy = PinterestStrategy::new(strategy_config)
        .context("Failed to create Pinterest strategy")?;

    let app = router(AppState {
        strategy: Arc::new(strategy),
    });

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);
    info!("Login at {}", config.strategy_url().trim_end_matches('/'));
    info!("Pinterest redirect URI: {}", redirect_uri);
    warn!("Auth results are returned as JSON, including the access token. Do not expose this host publicly.");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
