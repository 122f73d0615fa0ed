pub mod speech_to_text;
pub mod text_to_speech;

pub use speech_to_text::{SpeechToText, SpeechToTextView, STT_UNSUPPORTED_NOTICE};
pub use text_to_speech::{TextToSpeech, TextToSpeechView, TTS_UNSUPPORTED_NOTICE};
