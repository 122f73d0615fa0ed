pub mod analytics;
pub mod catalog;
pub mod domain;
pub mod library;
pub mod ports;
pub mod recommend;

pub use domain::{
    AnalyticsReport, AuthState, AuthStatus, Content, ContentBody, ContentKind, Difficulty,
    ExerciseStyle, Performance, PerformanceMetrics, PersonalizedReport, Preferences,
    ProgressPoint, QuizQuestion, SpeechAck, Stat, User, KNOWN_TOPICS,
};
pub use library::LibraryFilter;
pub use ports::{
    AccessibilityService, AnalyticsService, AuthService, ContentService, PortError, PortResult,
    RecognitionEvent, RecognitionEvents, RecognitionSettings, SpeechRecognizer,
    SpeechSynthesizer, SynthesisEvent, SynthesisEvents, TokenStore, Utterance,
};
pub use recommend::{recommend, MAX_RECOMMENDATIONS};
