//! services/portal/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::state::{AuthenticatedUser, BackendState};
use crate::wire::MessageResponse;

/// Middleware that validates the bearer token and extracts the user id.
///
/// If valid, inserts an `AuthenticatedUser` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<BackendState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let user_id = match token {
        Some(token) => state.validate_token(&token).await,
        None => None,
    };

    match user_id {
        Some(user_id) => {
            req.extensions_mut().insert(AuthenticatedUser(user_id));
            next.run(req).await
        }
        None => {
            debug!("Rejected {} {}: no valid token", req.method(), req.uri().path());
            (
                StatusCode::UNAUTHORIZED,
                Json(MessageResponse::new("Token is missing or invalid")),
            )
                .into_response()
        }
    }
}
