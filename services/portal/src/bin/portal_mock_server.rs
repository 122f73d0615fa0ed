//! services/portal/src/bin/portal_mock_server.rs

use portal_lib::{
    config::Config,
    error::ApiError,
    web::{self, rest::ApiDoc, BackendState},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting mock backend...");

    // --- 2. Build the Shared State and Router ---
    let state = Arc::new(BackendState::new(config.clone()));
    info!("Serving {} catalog items", state.catalog.len());
    let app = web::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 3. Stop on Ctrl-C ---
    let shutdown = CancellationToken::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown requested"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
        trigger.cancel();
    });

    // --- 4. Start the Server ---
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.mock_bind_address
    );
    let listener = tokio::net::TcpListener::bind(config.mock_bind_address).await?;
    web::serve(listener, app, shutdown).await
}
