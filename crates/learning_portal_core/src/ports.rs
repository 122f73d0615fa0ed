//! crates/learning_portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) the portal core depends on.
//! The HTTP client, token persistence and the host speech engines all live
//! behind these traits so stores and widgets can be driven by fakes.

use async_trait::async_trait;
use futures::channel::mpsc::UnboundedSender;

use crate::domain::{
    AnalyticsReport, Content, PerformanceMetrics, PersonalizedReport, Preferences, SpeechAck,
    User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, storage).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Capability unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Backend Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a session token.
    async fn login(&self, username: &str, password: &str) -> PortResult<String>;

    /// Creates an account and returns the new user id.
    async fn register(&self, username: &str, password: &str) -> PortResult<String>;

    async fn get_profile(&self) -> PortResult<User>;

    async fn update_profile(&self, preferences: &Preferences) -> PortResult<User>;
}

#[async_trait]
pub trait ContentService: Send + Sync {
    async fn list_content(&self) -> PortResult<Vec<Content>>;

    async fn get_content(&self, content_id: &str) -> PortResult<Content>;

    /// Recommendations derived server-side from the stored profile.
    async fn recommendations(&self) -> PortResult<Vec<Content>>;
}

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    async fn personalized_report(&self) -> PortResult<PersonalizedReport>;

    async fn overall_report(&self) -> PortResult<AnalyticsReport>;

    async fn record_performance(
        &self,
        activity_type: &str,
        metrics: &PerformanceMetrics,
    ) -> PortResult<()>;
}

#[async_trait]
pub trait AccessibilityService: Send + Sync {
    /// Asks the backend to speak `text`.
    async fn text_to_speech(&self, text: &str) -> PortResult<SpeechAck>;

    /// Asks the backend for a transcript. `None` means no speech was detected.
    async fn speech_to_text(&self) -> PortResult<Option<String>>;
}

//=========================================================================================
// Local Ports
//=========================================================================================

/// Durable storage for the single session token.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> PortResult<()>;

    fn clear(&self) -> PortResult<()>;
}

/// A single piece of text handed to a speech synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisEvent {
    Ended,
    Failed(String),
}

pub type SynthesisEvents = UnboundedSender<SynthesisEvent>;

/// A host speech-synthesis capability.
pub trait SpeechSynthesizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Starts speaking. Completion or failure is reported on `events`.
    fn speak(&self, utterance: Utterance, events: SynthesisEvents) -> PortResult<()>;

    fn cancel(&self);

    /// Changes the volume of the utterance currently playing.
    fn set_volume(&self, volume: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionSettings {
    pub continuous: bool,
    pub interim_results: bool,
    pub language: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    /// The latest (possibly interim) transcript of the current phrase.
    Result(String),
    Failed(String),
    Ended,
}

pub type RecognitionEvents = UnboundedSender<RecognitionEvent>;

/// A host speech-recognition capability.
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    fn start(&self, settings: &RecognitionSettings, events: RecognitionEvents) -> PortResult<()>;

    fn stop(&self);
}
