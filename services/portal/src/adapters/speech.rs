//! services/portal/src/adapters/speech.rs
//!
//! The speech host used when the environment has no speech engine. It
//! implements both speech ports and reports itself unavailable, so the
//! widgets render their fallback notices.

use learning_portal_core::ports::{
    PortError, PortResult, RecognitionEvents, RecognitionSettings, SpeechRecognizer,
    SpeechSynthesizer, SynthesisEvents, Utterance,
};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedSpeechHost;

impl SpeechSynthesizer for UnsupportedSpeechHost {
    fn is_available(&self) -> bool {
        false
    }

    fn speak(&self, _utterance: Utterance, _events: SynthesisEvents) -> PortResult<()> {
        Err(PortError::Unavailable("speech synthesis".to_string()))
    }

    fn cancel(&self) {}

    fn set_volume(&self, volume: f32) {
        debug!("Ignoring volume change to {} without a synthesizer", volume);
    }
}

impl SpeechRecognizer for UnsupportedSpeechHost {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&self, _settings: &RecognitionSettings, _events: RecognitionEvents) -> PortResult<()> {
        Err(PortError::Unavailable("speech recognition".to_string()))
    }

    fn stop(&self) {}
}
