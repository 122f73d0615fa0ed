//! services/portal/src/context.rs
//!
//! Wires the HTTP adapter, the token store and the speech host into the two
//! stores, and hands out widgets and views bound to them.

use chrono::Utc;
use learning_portal_core::ports::{SpeechRecognizer, SpeechSynthesizer, TokenStore};
use std::sync::Arc;
use tracing::info;

use crate::adapters::{FileTokenStore, HttpApiClient, UnsupportedSpeechHost};
use crate::config::Config;
use crate::error::ApiError;
use crate::stores::{AuthStore, ContentStore, LoadReport};
use crate::views::ContentDetail;
use crate::widgets::{SpeechToText, TextToSpeech};

/// The host's speech engines.
#[derive(Clone)]
pub struct SpeechHost {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub recognizer: Arc<dyn SpeechRecognizer>,
}

impl SpeechHost {
    pub fn unsupported() -> Self {
        Self {
            synthesizer: Arc::new(UnsupportedSpeechHost),
            recognizer: Arc::new(UnsupportedSpeechHost),
        }
    }
}

pub struct PortalContext {
    pub config: Config,
    pub client: Arc<HttpApiClient>,
    pub auth: AuthStore,
    pub content: ContentStore,
    pub speech: SpeechHost,
}

impl PortalContext {
    pub fn new(
        config: Config,
        tokens: Arc<dyn TokenStore>,
        speech: SpeechHost,
    ) -> Result<Self, ApiError> {
        let client = Arc::new(HttpApiClient::from_config(&config, tokens.clone())?);
        let auth = AuthStore::new(client.clone(), tokens);
        let content = ContentStore::new(client.clone(), client.clone());
        Ok(Self {
            config,
            client,
            auth,
            content,
            speech,
        })
    }

    /// Builds a context over the on-disk token, restores the session and loads content.
    pub async fn bootstrap(config: Config) -> Result<(Self, LoadReport), ApiError> {
        let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
        let context = Self::new(config, tokens, SpeechHost::unsupported())?;
        let report = context.start().await;
        Ok((context, report))
    }

    /// Restores any persisted session, then loads content with its token attached.
    pub async fn start(&self) -> LoadReport {
        let status = self.auth.restore_session().await;
        info!("Session status on start: {:?}", status);
        self.content.load().await
    }

    pub fn text_to_speech(&self, text: impl Into<String>) -> TextToSpeech {
        TextToSpeech::new(self.speech.synthesizer.clone(), text)
    }

    pub fn speech_to_text(&self) -> SpeechToText {
        SpeechToText::new(
            self.speech.recognizer.clone(),
            self.config.speech_language.clone(),
        )
    }

    /// Opens a loaded catalog item, starting its clock now.
    pub fn open_content(&self, id: &str) -> Option<ContentDetail> {
        ContentDetail::open(&self.content, id, Utc::now())
    }
}
