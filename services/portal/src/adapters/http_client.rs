//! services/portal/src/adapters/http_client.rs
//!
//! The HTTP adapter for the backend REST contract. It implements every
//! backend port from the `core` crate and attaches the persisted session
//! token to each request as a bearer credential.

use async_trait::async_trait;
use learning_portal_core::domain::{
    AnalyticsReport, Content, PerformanceMetrics, PersonalizedReport, Preferences, SpeechAck, User,
};
use learning_portal_core::ports::{
    AccessibilityService, AnalyticsService, AuthService, ContentService, PortError, PortResult,
    TokenStore,
};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;
use crate::wire::{
    contents_to_domain, ContentRecord, CredentialsRequest, MessageResponse, MetricsRecord,
    OverallReportEnvelope, PerformanceRequest, PersonalizedReportEnvelope, PreferencesRequest,
    RecommendationsEnvelope, RegisterResponse, TokenResponse, TranscriptResponse, TtsRequest,
    UserRecord,
};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the backend ports over HTTP using `reqwest`.
#[derive(Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApiClient {
    /// Creates a new `HttpApiClient` for the API rooted at `base_url` (e.g. `http://host/api`).
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            http,
            base_url,
            tokens,
        })
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(config.api_base_url.clone(), config.request_timeout, tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_to(method, format!("{}{}", self.base_url, path))
    }

    /// Appends `segments` to the base URL, percent-encoding each one as a
    /// single path segment.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PortError::Unexpected(format!("Invalid API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| {
                PortError::Unexpected(format!("API base URL cannot take a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request_to(&self, method: Method, url: impl IntoUrl + std::fmt::Display) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and turns any non-success status into a `PortError`.
    async fn send(&self, builder: RequestBuilder) -> PortResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Prefer the backend's own message when it sent one.
        let message = response
            .json::<MessageResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        Err(status_error(status, message))
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> PortResult<T> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to decode response: {}", e)))
    }
}

fn status_error(status: StatusCode, message: String) -> PortError {
    match status {
        StatusCode::BAD_REQUEST => PortError::InvalidInput(message),
        StatusCode::UNAUTHORIZED => PortError::Unauthorized,
        StatusCode::NOT_FOUND => PortError::NotFound(message),
        StatusCode::CONFLICT => PortError::Conflict(message),
        _ => PortError::Unexpected(format!("{}: {}", status, message)),
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl AuthService for HttpApiClient {
    async fn login(&self, username: &str, password: &str) -> PortResult<String> {
        let body = CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: TokenResponse = self
            .send_json(self.request(Method::POST, "/login").json(&body))
            .await?;
        Ok(response.token)
    }

    async fn register(&self, username: &str, password: &str) -> PortResult<String> {
        let body = CredentialsRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: RegisterResponse = self
            .send_json(self.request(Method::POST, "/register").json(&body))
            .await?;
        Ok(response.user_id)
    }

    async fn get_profile(&self) -> PortResult<User> {
        let record: UserRecord = self.send_json(self.request(Method::GET, "/profile")).await?;
        record.to_domain()
    }

    async fn update_profile(&self, preferences: &Preferences) -> PortResult<User> {
        let body = PreferencesRequest::from_domain(preferences);
        let record: UserRecord = self
            .send_json(self.request(Method::POST, "/profile").json(&body))
            .await?;
        record.to_domain()
    }
}

#[async_trait]
impl ContentService for HttpApiClient {
    async fn list_content(&self) -> PortResult<Vec<Content>> {
        let records: Vec<ContentRecord> =
            self.send_json(self.request(Method::GET, "/content")).await?;
        contents_to_domain(records)
    }

    async fn get_content(&self, content_id: &str) -> PortResult<Content> {
        let url = self.endpoint(&["content", content_id])?;
        let record: ContentRecord = self.send_json(self.request_to(Method::GET, url)).await?;
        record.to_domain()
    }

    async fn recommendations(&self) -> PortResult<Vec<Content>> {
        let envelope: RecommendationsEnvelope = self
            .send_json(self.request(Method::GET, "/recommendations"))
            .await?;
        contents_to_domain(envelope.recommendations)
    }
}

#[async_trait]
impl AnalyticsService for HttpApiClient {
    async fn personalized_report(&self) -> PortResult<PersonalizedReport> {
        let result: PortResult<PersonalizedReportEnvelope> = self
            .send_json(self.request(Method::GET, "/analytics/report/personalized"))
            .await;
        match result {
            Ok(envelope) => envelope.report.to_domain(),
            // The backend answers 404 until the user has recorded something.
            Err(PortError::NotFound(_)) => Ok(PersonalizedReport::default()),
            Err(e) => Err(e),
        }
    }

    async fn overall_report(&self) -> PortResult<AnalyticsReport> {
        let envelope: OverallReportEnvelope = self
            .send_json(self.request(Method::GET, "/analytics/report/overall"))
            .await?;
        Ok(envelope.overall_report.to_domain())
    }

    async fn record_performance(
        &self,
        activity_type: &str,
        metrics: &PerformanceMetrics,
    ) -> PortResult<()> {
        let body = PerformanceRequest {
            activity_type: activity_type.to_string(),
            metrics: MetricsRecord::from_domain(metrics),
        };
        self.send(self.request(Method::POST, "/performance").json(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AccessibilityService for HttpApiClient {
    async fn text_to_speech(&self, text: &str) -> PortResult<SpeechAck> {
        let body = TtsRequest {
            text: text.to_string(),
        };
        let response: MessageResponse = self
            .send_json(self.request(Method::POST, "/tts").json(&body))
            .await?;
        Ok(SpeechAck {
            message: response.message,
        })
    }

    async fn speech_to_text(&self) -> PortResult<Option<String>> {
        let response = self.send(self.request(Method::POST, "/stt")).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let body = response
            .json::<TranscriptResponse>()
            .await
            .map_err(|e| PortError::Unexpected(format!("Failed to decode response: {}", e)))?;
        Ok(Some(body.transcript))
    }
}
