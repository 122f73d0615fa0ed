//! services/portal/src/web/rest.rs
//!
//! Contains the Axum handlers for the content, analytics and accessibility
//! endpoints and the master definition for the OpenAPI specification.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use learning_portal_core::domain::{AnalyticsReport, Difficulty, Performance, PersonalizedReport};
use learning_portal_core::recommend::recommend;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use crate::web::auth;
use crate::web::state::{AuthenticatedUser, BackendState};
use crate::web::{reject, Rejection};
use crate::wire::{
    AnalyticsReportRecord, ContentRecord, CredentialsRequest, MessageResponse, MetricsRecord,
    OverallReportEnvelope, PersonalizedReportEnvelope, PersonalizedReportRecord,
    PreferencesRequest, RecommendationsEnvelope, RegisterResponse, TokenResponse,
    TranscriptResponse, TtsRequest, UserRecord,
};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::get_profile_handler,
        auth::update_profile_handler,
        list_content_handler,
        get_content_handler,
        recommendations_handler,
        personalized_report_handler,
        overall_report_handler,
        record_performance_handler,
        text_to_speech_handler,
        speech_to_text_handler,
    ),
    components(
        schemas(
            CredentialsRequest, TokenResponse, RegisterResponse, UserRecord, PreferencesRequest,
            ContentRecord, RecommendationsEnvelope, PersonalizedReportEnvelope,
            PersonalizedReportRecord, OverallReportEnvelope, AnalyticsReportRecord,
            PerformancePayload, MetricsRecord, MessageResponse, TtsRequest, TranscriptResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Learning Portal API", description = "Mock backend for the dyslexia learning portal.")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// API Payload Structs
//=========================================================================================

/// The body of `POST /performance`. Both fields are checked by the handler.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PerformancePayload {
    #[serde(default)]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub metrics: MetricsRecord,
}

//=========================================================================================
// Content Handlers
//=========================================================================================

/// List the whole catalog.
#[utoipa::path(
    get,
    path = "/api/content",
    responses((status = 200, description = "All content items", body = [ContentRecord]))
)]
pub async fn list_content_handler(
    State(state): State<Arc<BackendState>>,
) -> Json<Vec<ContentRecord>> {
    Json(state.catalog.iter().map(ContentRecord::from_domain).collect())
}

/// Fetch one catalog item.
#[utoipa::path(
    get,
    path = "/api/content/{content_id}",
    params(("content_id" = String, Path, description = "The catalog id, e.g. `quiz_1`.")),
    responses(
        (status = 200, description = "The content item", body = ContentRecord),
        (status = 404, description = "No such content")
    ),
    security(("bearer" = []))
)]
pub async fn get_content_handler(
    State(state): State<Arc<BackendState>>,
    Path(content_id): Path<String>,
) -> Result<Json<ContentRecord>, Rejection> {
    state
        .find_content(&content_id)
        .map(|item| Json(ContentRecord::from_domain(item)))
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Content not found"))
}

/// Recommendations from the user's stored preferences.
#[utoipa::path(
    get,
    path = "/api/recommendations",
    responses((status = 200, description = "Up to three items", body = RecommendationsEnvelope)),
    security(("bearer" = []))
)]
pub async fn recommendations_handler(
    State(state): State<Arc<BackendState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Json<RecommendationsEnvelope> {
    let (topics, difficulty) = {
        let accounts = state.accounts.read().await;
        match accounts.get(&user_id) {
            Some(account) => (account.preferred_topics.clone(), account.difficulty_level),
            None => (Vec::new(), Difficulty::Medium),
        }
    };
    let recommendations = recommend(&state.catalog, &topics, Some(difficulty))
        .into_iter()
        .map(ContentRecord::from_domain)
        .collect();
    Json(RecommendationsEnvelope { recommendations })
}

//=========================================================================================
// Analytics Handlers
//=========================================================================================

/// The signed-in user's history and its summary.
#[utoipa::path(
    get,
    path = "/api/analytics/report/personalized",
    responses(
        (status = 200, description = "History and summary", body = PersonalizedReportEnvelope),
        (status = 404, description = "Nothing recorded yet")
    ),
    security(("bearer" = []))
)]
pub async fn personalized_report_handler(
    State(state): State<Arc<BackendState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
) -> Result<Json<PersonalizedReportEnvelope>, Rejection> {
    let accounts = state.accounts.read().await;
    let performance = accounts
        .get(&user_id)
        .map(|a| a.performance.clone())
        .unwrap_or_default();
    if performance.is_empty() {
        return Err(reject(StatusCode::NOT_FOUND, "No performance data found"));
    }
    let report = PersonalizedReport {
        summary: AnalyticsReport::summarize(&performance),
        performance,
    };
    Ok(Json(PersonalizedReportEnvelope {
        report: PersonalizedReportRecord::from_domain(&report),
    }))
}

/// Summary across every learner.
#[utoipa::path(
    get,
    path = "/api/analytics/report/overall",
    responses(
        (status = 200, description = "Overall summary", body = OverallReportEnvelope),
        (status = 404, description = "Nothing recorded yet")
    ),
    security(("bearer" = []))
)]
pub async fn overall_report_handler(
    State(state): State<Arc<BackendState>>,
) -> Result<Json<OverallReportEnvelope>, Rejection> {
    let accounts = state.accounts.read().await;
    let everything: Vec<Performance> = accounts
        .values()
        .flat_map(|a| a.performance.iter().cloned())
        .collect();
    let report = AnalyticsReport::summarize(&everything)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "No performance data found"))?;
    Ok(Json(OverallReportEnvelope {
        overall_report: AnalyticsReportRecord::from_domain(&report),
    }))
}

/// Record one activity. The server stamps it with its own clock.
#[utoipa::path(
    post,
    path = "/api/performance",
    request_body = PerformancePayload,
    responses(
        (status = 201, description = "Performance recorded successfully", body = MessageResponse),
        (status = 400, description = "Missing activity type or invalid metrics")
    ),
    security(("bearer" = []))
)]
pub async fn record_performance_handler(
    State(state): State<Arc<BackendState>>,
    Extension(AuthenticatedUser(user_id)): Extension<AuthenticatedUser>,
    Json(payload): Json<PerformancePayload>,
) -> Result<impl IntoResponse, Rejection> {
    let activity = payload
        .activity_type
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| reject(StatusCode::BAD_REQUEST, "Activity type is required"))?;

    let metrics = payload.metrics;
    let difficulty = metrics
        .difficulty_level
        .as_deref()
        .map(str::parse::<Difficulty>)
        .transpose()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
    let mut record = Performance::new(activity, Utc::now());
    record.score = metrics.score;
    record.time_spent_secs = metrics.time_spent;
    record.completion_rate = metrics.completion_rate;
    record.difficulty_level = difficulty;
    record
        .validate()
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut accounts = state.accounts.write().await;
    let account = accounts
        .get_mut(&user_id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "User not found"))?;
    debug!("{} recorded {}", account.username, record.activity);
    account.performance.push(record);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Performance recorded successfully")),
    ))
}

//=========================================================================================
// Accessibility Handlers
//=========================================================================================

/// Acknowledge a text-to-speech request.
#[utoipa::path(
    post,
    path = "/api/tts",
    request_body = TtsRequest,
    responses(
        (status = 200, description = "Text spoken", body = MessageResponse),
        (status = 400, description = "No text provided")
    ),
    security(("bearer" = []))
)]
pub async fn text_to_speech_handler(
    Json(req): Json<TtsRequest>,
) -> Result<Json<MessageResponse>, Rejection> {
    if req.text.trim().is_empty() {
        return Err(reject(StatusCode::BAD_REQUEST, "No text provided"));
    }
    info!("Speaking {} characters", req.text.chars().count());
    Ok(Json(MessageResponse::new("Text spoken successfully")))
}

/// Transcribe from the server microphone. The mock has none.
#[utoipa::path(
    post,
    path = "/api/stt",
    responses(
        (status = 200, description = "Transcript", body = TranscriptResponse),
        (status = 204, description = "Nothing was heard")
    ),
    security(("bearer" = []))
)]
pub async fn speech_to_text_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}
