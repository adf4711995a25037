use std::sync::Arc;

use bridgette_backend::{app, logging, AppState, Config};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        format!(
            "Failed to load configuration: {}. \
             Make sure config.toml exists or set BRIDGETTE__REGISTRY__SPREADSHEET_ID.",
            e
        )
    })?;

    logging::init(&config.logging.level);

    tracing::info!("Starting Bridgette chat bot");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::from_config(config)?);

    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
