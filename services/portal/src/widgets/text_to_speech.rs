//! services/portal/src/widgets/text_to_speech.rs
//!
//! Read-aloud control: a play/pause toggle and a mute toggle over the host
//! speech synthesizer.

use futures::channel::mpsc::{self, UnboundedReceiver};
use futures::StreamExt;
use learning_portal_core::ports::{SpeechSynthesizer, SynthesisEvent, Utterance};
use std::sync::Arc;
use tracing::{debug, warn};

/// Slightly slower than normal speech.
pub const SPEECH_RATE: f32 = 0.9;
pub const SPEECH_PITCH: f32 = 1.0;

pub const TTS_UNSUPPORTED_NOTICE: &str = "Text-to-speech is not supported in this environment.";

#[derive(Debug, Clone, PartialEq)]
pub enum TextToSpeechView {
    Unsupported {
        notice: &'static str,
    },
    Controls {
        play_label: &'static str,
        muted: bool,
        caption: &'static str,
    },
}

pub struct TextToSpeech {
    engine: Arc<dyn SpeechSynthesizer>,
    text: String,
    playing: bool,
    muted: bool,
    events: Option<UnboundedReceiver<SynthesisEvent>>,
}

impl TextToSpeech {
    pub fn new(engine: Arc<dyn SpeechSynthesizer>, text: impl Into<String>) -> Self {
        Self {
            engine,
            text: text.into(),
            playing: false,
            muted: false,
            events: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_available()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            1.0
        }
    }

    /// Starts reading the text, or stops the current reading. Returns whether it is now playing.
    pub fn toggle_playback(&mut self) -> bool {
        self.pump_events();
        if !self.is_available() {
            return false;
        }

        if self.playing {
            self.engine.cancel();
            self.playing = false;
            self.events = None;
            return false;
        }

        let (sender, receiver) = mpsc::unbounded();
        let utterance = Utterance {
            text: self.text.clone(),
            rate: SPEECH_RATE,
            pitch: SPEECH_PITCH,
            volume: self.volume(),
        };
        match self.engine.speak(utterance, sender) {
            Ok(()) => {
                self.playing = true;
                self.events = Some(receiver);
            }
            Err(e) => warn!("Speech synthesis failed to start: {}", e),
        }
        self.playing
    }

    /// Flips mute. Only the volume changes; playback carries on.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.playing {
            self.engine.set_volume(self.volume());
        }
        self.muted
    }

    /// Applies the engine events that have already arrived, up to the one
    /// that ends the session. Anything queued behind it is discarded.
    pub fn pump_events(&mut self) {
        while let Some(events) = self.events.as_mut() {
            match events.try_recv() {
                Ok(event) => self.apply(event),
                Err(_) => break,
            }
        }
    }

    /// Waits until the current reading ends or fails.
    pub async fn finished(&mut self) {
        while self.playing {
            let next = match self.events.as_mut() {
                Some(events) => events.next().await,
                None => None,
            };
            match next {
                Some(event) => self.apply(event),
                None => {
                    // Engine went away without reporting the end.
                    self.playing = false;
                    self.events = None;
                }
            }
        }
    }

    fn apply(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Ended => debug!("Reading finished"),
            SynthesisEvent::Failed(reason) => warn!("Reading failed: {}", reason),
        }
        self.playing = false;
        self.events = None;
    }

    pub fn view(&self) -> TextToSpeechView {
        if !self.is_available() {
            return TextToSpeechView::Unsupported {
                notice: TTS_UNSUPPORTED_NOTICE,
            };
        }
        TextToSpeechView::Controls {
            play_label: if self.playing { "Pause" } else { "Read Aloud" },
            muted: self.muted,
            caption: "Text-to-Speech enabled",
        }
    }
}

impl Drop for TextToSpeech {
    fn drop(&mut self) {
        if self.playing {
            self.engine.cancel();
        }
    }
}
