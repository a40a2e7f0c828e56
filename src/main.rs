use door_relay::{api, config::AppConfig, core::Relay, errors::Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load configuration; missing store parameters stop us here
    let config = AppConfig::from_env()
        .inspect_err(|e| error!("Invalid configuration: {}", e))?;

    // 4. Build the relay (connects and creates tables for the database backend)
    let relay = Relay::from_config(&config)
        .await
        .inspect_err(|e| error!("Failed to initialize stores: {}", e))?;

    // 5. Serve
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", addr, e))?;
    info!("Door relay listening on {}", addr);

    axum::serve(listener, api::router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Door relay stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
