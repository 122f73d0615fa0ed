//! services/portal/src/widgets/speech_to_text.rs
//!
//! Dictation control: a listen toggle over the host speech recognizer, the
//! current transcript, and a submit action.

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::StreamExt;
use learning_portal_core::ports::{RecognitionEvent, RecognitionSettings, SpeechRecognizer};
use std::sync::Arc;
use tracing::{error, warn};

pub const STT_UNSUPPORTED_NOTICE: &str =
    "Speech recognition is not supported in your browser. Please try using Chrome, Edge, or Safari.";

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechToTextView {
    Unsupported {
        notice: &'static str,
    },
    Controls {
        button_label: &'static str,
        status: &'static str,
        /// Present once something has been heard; the submit button shows with it.
        transcript: Option<String>,
    },
}

pub struct SpeechToText {
    engine: Arc<dyn SpeechRecognizer>,
    settings: RecognitionSettings,
    listening: bool,
    transcript: String,
    events: Option<UnboundedReceiver<RecognitionEvent>>,
}

impl SpeechToText {
    pub fn new(engine: Arc<dyn SpeechRecognizer>, language: impl Into<String>) -> Self {
        Self {
            engine,
            settings: RecognitionSettings {
                continuous: true,
                interim_results: true,
                language: language.into(),
            },
            listening: false,
            transcript: String::new(),
            events: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn settings(&self) -> &RecognitionSettings {
        &self.settings
    }

    /// Starts or stops listening. Starting clears the previous transcript.
    pub fn toggle_listening(&mut self) -> bool {
        self.pump_events();
        if !self.is_available() {
            return false;
        }

        if self.listening {
            self.engine.stop();
            self.listening = false;
            self.events = None;
            return false;
        }

        self.transcript.clear();
        let (sender, receiver) = mpsc::unbounded();
        match self.engine.start(&self.settings, sender) {
            Ok(()) => {
                self.listening = true;
                self.events = Some(receiver);
            }
            Err(e) => warn!("Speech recognition failed to start: {}", e),
        }
        self.listening
    }

    /// Applies the recognizer events that have already arrived, up to the one
    /// that ends the session. Anything queued behind it is discarded.
    pub fn pump_events(&mut self) {
        while let Some(events) = self.events.as_mut() {
            match events.try_recv() {
                Ok(event) => self.apply(event),
                Err(_) => break,
            }
        }
    }

    /// Waits for the next recognizer event and applies it. `None` once not listening.
    pub async fn next_event(&mut self) -> Option<RecognitionEvent> {
        let event = self.events.as_mut()?.next().await;
        match event {
            Some(event) => {
                self.apply(event.clone());
                Some(event)
            }
            None => {
                self.listening = false;
                self.events = None;
                None
            }
        }
    }

    fn apply(&mut self, event: RecognitionEvent) {
        match event {
            // Interim results replace the transcript rather than extend it.
            RecognitionEvent::Result(text) => self.transcript = text,
            RecognitionEvent::Failed(reason) => {
                error!("Speech recognition error: {}", reason);
                self.listening = false;
                self.events = None;
            }
            RecognitionEvent::Ended => {
                self.listening = false;
                self.events = None;
            }
        }
    }

    /// Hands a non-blank transcript to `on_transcript` and clears it.
    pub fn submit<F: FnOnce(&str)>(&mut self, on_transcript: F) -> bool {
        self.pump_events();
        if self.transcript.trim().is_empty() {
            return false;
        }
        let transcript = std::mem::take(&mut self.transcript);
        on_transcript(&transcript);
        true
    }

    pub fn view(&self) -> SpeechToTextView {
        if !self.is_available() {
            return SpeechToTextView::Unsupported {
                notice: STT_UNSUPPORTED_NOTICE,
            };
        }
        SpeechToTextView::Controls {
            button_label: if self.listening {
                "Stop Listening"
            } else {
                "Start Speaking"
            },
            status: if self.listening {
                "Listening..."
            } else {
                "Click to speak"
            },
            transcript: (!self.transcript.is_empty()).then(|| self.transcript.clone()),
        }
    }
}

impl Drop for SpeechToText {
    fn drop(&mut self) {
        if self.listening {
            self.engine.stop();
        }
    }
}
