//! services/portal/src/web/auth.rs
//!
//! Authentication and profile endpoints for the mock backend.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use learning_portal_core::domain::Difficulty;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::state::{Account, AuthenticatedUser, BackendState};
use crate::web::{reject, Rejection};
use crate::wire::{CredentialsRequest, PreferencesRequest, RegisterResponse, TokenResponse, UserRecord};

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /register - Create a new account
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Username or password missing"),
        (status = 409, description = "Username already taken")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<BackendState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, Rejection> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
        ));
    }

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    // 2. Store the account, refusing duplicate usernames
    let mut accounts = state.accounts.write().await;
    if accounts.values().any(|a| a.username == username) {
        return Err(reject(StatusCode::CONFLICT, "Username already exists"));
    }
    let account = Account::new(username, password_hash);
    let user_id = account.user_id.clone();
    accounts.insert(user_id.clone(), account);
    info!("Registered {} as {}", username, user_id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id,
            message: Some("User registered successfully".to_string()),
        }),
    ))
}

/// POST /login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<BackendState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, Rejection> {
    let invalid = || reject(StatusCode::UNAUTHORIZED, "Invalid credentials");

    // 1. Find the account by username
    let (user_id, stored_hash) = {
        let accounts = state.accounts.read().await;
        let account = accounts
            .values()
            .find(|a| a.username == req.username.trim())
            .ok_or_else(invalid)?;
        (account.user_id.clone(), account.password_hash.clone())
    };

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    // 3. Issue the token
    let token = state.issue_token(&user_id).await;
    Ok(Json(TokenResponse { token }))
}

/// GET /profile - The signed-in user's profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current profile", body = UserRecord),
        (status = 401, description = "Token is missing or invalid")
    ),
    security(("bearer" = []))
)]
pub async fn get_profile_handler(
    State(state): State<Arc<BackendState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<UserRecord>, Rejection> {
    let accounts = state.accounts.read().await;
    let account = accounts
        .get(&user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(UserRecord::from_domain(&account.to_user())))
}

/// POST /profile - Update learning preferences
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = PreferencesRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserRecord),
        (status = 400, description = "Unknown difficulty level"),
        (status = 401, description = "Token is missing or invalid")
    ),
    security(("bearer" = []))
)]
pub async fn update_profile_handler(
    State(state): State<Arc<BackendState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(req): Json<PreferencesRequest>,
) -> Result<Json<UserRecord>, Rejection> {
    let difficulty = req
        .difficulty_level
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut accounts = state.accounts.write().await;
    let account = accounts
        .get_mut(&user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "User not found"))?;
    if let Some(topics) = req.preferred_topics {
        account.preferred_topics = topics;
    }
    if let Some(difficulty) = difficulty {
        account.difficulty_level = difficulty;
    }
    info!("Updated preferences for {}", account.username);
    Ok(Json(UserRecord::from_domain(&account.to_user())))
}
