//! services/portal/src/web/mod.rs
//!
//! The development mock backend: an Axum router serving the REST contract
//! the portal client talks to, over in-memory state.

pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method, StatusCode,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::wire::MessageResponse;

pub use middleware::require_auth;
pub use state::BackendState;

/// The error half of every handler: a status and a `{ "message": ... }` body.
pub type Rejection = (StatusCode, Json<MessageResponse>);

pub fn reject(status: StatusCode, message: impl Into<String>) -> Rejection {
    (status, Json(MessageResponse::new(message)))
}

/// Builds the `/api` router over the given state.
pub fn router(state: Arc<BackendState>) -> Router {
    let cors = cors_layer(&state.config.mock_allowed_origin);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/register", post(auth::register_handler))
        .route("/login", post(auth::login_handler))
        .route("/content", get(rest::list_content_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/profile",
            get(auth::get_profile_handler).post(auth::update_profile_handler),
        )
        .route("/content/{content_id}", get(rest::get_content_handler))
        .route("/recommendations", get(rest::recommendations_handler))
        .route(
            "/analytics/report/personalized",
            get(rest::personalized_report_handler),
        )
        .route(
            "/analytics/report/overall",
            get(rest::overall_report_handler),
        )
        .route("/performance", post(rest::record_performance_handler))
        .route("/tts", post(rest::text_to_speech_handler))
        .route("/stt", post(rest::speech_to_text_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state);

    Router::new().nest("/api", api_router).layer(cors)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);
    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("Ignoring invalid allowed origin {:?}: {}", origin, e);
            cors
        }
    }
}

/// Serves `app` on `listener` until `shutdown` is cancelled.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: CancellationToken,
) -> Result<(), ApiError> {
    info!("Mock backend listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("Mock backend stopped");
    Ok(())
}
