//! Main entry point for the Media API Gateway

use media_api_gateway::{api, config::Settings, AppState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    let dotenv = dotenvy::dotenv();

    // Load configuration
    let settings = Settings::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.logging.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }

    info!("Starting Media API Gateway");
    if let Err(e) = dotenv {
        info!(reason = %e, "No .env file loaded");
    }

    settings.validate()?;

    let providers = &settings.providers;
    for (name, configured) in [
        ("serper", providers.serper.api_key().is_some()),
        ("omdb", providers.omdb.api_key().is_some()),
        ("groq", providers.groq.api_key().is_some()),
        ("nebius", providers.nebius.api_key().is_some()),
    ] {
        if !configured {
            warn!(provider = name, "No API key configured; its endpoints will report a configuration error");
        }
    }

    let addr = settings.server_addr();
    info!(addr = %addr, "Loaded configuration");

    let app_state = Arc::new(AppState::new(settings)?);

    // Build the router
    let app = api::routes::create_router(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
