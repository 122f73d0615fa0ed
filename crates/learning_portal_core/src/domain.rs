//! crates/learning_portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the learning portal.
//! These structs are independent of any wire or storage format.

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::ports::PortError;

//=========================================================================================
// Tags
//=========================================================================================

/// How demanding a piece of content is, and the level a learner prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(PortError::InvalidInput(format!(
                "unknown difficulty level '{}'",
                other
            ))),
        }
    }
}

/// The type tag of a content item. Derived from the body, never stored separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Article,
    Video,
    Exercise,
    Game,
    Quiz,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Video => "video",
            ContentKind::Exercise => "exercise",
            ContentKind::Game => "game",
            ContentKind::Quiz => "quiz",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "article" => Ok(ContentKind::Article),
            "video" => Ok(ContentKind::Video),
            "exercise" => Ok(ContentKind::Exercise),
            "game" => Ok(ContentKind::Game),
            "quiz" => Ok(ContentKind::Quiz),
            other => Err(PortError::InvalidInput(format!(
                "unknown content type '{}'",
                other
            ))),
        }
    }
}

/// The topic tags the catalog is organised around.
pub const KNOWN_TOPICS: [&str; 6] = [
    "learning_disabilities",
    "reading_strategies",
    "phonological_awareness",
    "auditory_processing",
    "reading_comprehension",
    "assistive_technology",
];

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// Represents a learner - used throughout the app.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub preferred_topics: Vec<String>,
    pub difficulty_level: Difficulty,
}

/// The learning preferences a user can change from the profile screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub preferred_topics: Vec<String>,
    pub difficulty_level: Difficulty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
    Loading,
}

/// The client's view of the current login session.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub status: AuthStatus,
    pub token: Option<String>,
}

impl AuthState {
    pub fn unauthenticated() -> Self {
        Self {
            user: None,
            status: AuthStatus::Unauthenticated,
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

//=========================================================================================
// Content
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseStyle {
    Exercise,
    Game,
}

/// The variant-specific part of a content item.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBody {
    Article {
        text: String,
    },
    Video {
        url: String,
        duration_secs: u32,
    },
    Exercise {
        instructions: String,
        style: ExerciseStyle,
    },
    Quiz {
        questions: Vec<QuizQuestion>,
    },
}

/// A read-only catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Content {
    pub id: String,
    pub title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub tts_enabled: bool,
    pub stt_enabled: bool,
    pub image_url: Option<String>,
    pub body: ContentBody,
}

impl Content {
    pub fn kind(&self) -> ContentKind {
        match &self.body {
            ContentBody::Article { .. } => ContentKind::Article,
            ContentBody::Video { .. } => ContentKind::Video,
            ContentBody::Exercise {
                style: ExerciseStyle::Exercise,
                ..
            } => ContentKind::Exercise,
            ContentBody::Exercise {
                style: ExerciseStyle::Game,
                ..
            } => ContentKind::Game,
            ContentBody::Quiz { .. } => ContentKind::Quiz,
        }
    }

    /// The quiz questions, or an empty slice for every other variant.
    pub fn questions(&self) -> &[QuizQuestion] {
        match &self.body {
            ContentBody::Quiz { questions } => questions,
            _ => &[],
        }
    }
}

//=========================================================================================
// Performance and Analytics
//=========================================================================================

/// A single logged interaction between a user and one content item.
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    pub timestamp: DateTime<Utc>,
    /// The id of the content item the record belongs to.
    pub activity: String,
    pub score: Option<f64>,
    pub time_spent_secs: Option<f64>,
    pub completion_rate: Option<f64>,
    pub difficulty_level: Option<Difficulty>,
}

impl Performance {
    pub fn new(activity: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            activity: activity.into(),
            score: None,
            time_spent_secs: None,
            completion_rate: None,
            difficulty_level: None,
        }
    }

    /// Checks the percentage fields are within 0-100 and time spent is not negative.
    pub fn validate(&self) -> Result<(), PortError> {
        if self.activity.trim().is_empty() {
            return Err(PortError::InvalidInput(
                "performance record has no activity".to_string(),
            ));
        }
        for (name, value) in [("score", self.score), ("completion rate", self.completion_rate)] {
            if let Some(v) = value {
                if !(0.0..=100.0).contains(&v) {
                    return Err(PortError::InvalidInput(format!(
                        "{} {} is outside 0-100",
                        name, v
                    )));
                }
            }
        }
        if let Some(t) = self.time_spent_secs {
            if t < 0.0 || !t.is_finite() {
                return Err(PortError::InvalidInput(format!(
                    "time spent {} is not a valid duration",
                    t
                )));
            }
        }
        Ok(())
    }

    /// The metric payload sent alongside the activity when recording.
    pub fn metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            score: self.score,
            time_spent_secs: self.time_spent_secs,
            completion_rate: self.completion_rate,
            difficulty_level: self.difficulty_level,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceMetrics {
    pub score: Option<f64>,
    pub time_spent_secs: Option<f64>,
    pub completion_rate: Option<f64>,
    pub difficulty_level: Option<Difficulty>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stat {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    pub date: NaiveDate,
    pub score: f64,
}

/// A derived, read-only aggregate over performance records.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsReport {
    pub scores: Stat,
    pub time_spent: Stat,
    pub completion_rate: Stat,
    pub progress_over_time: Vec<ProgressPoint>,
}

/// One user's performance history together with its summary, when the backend sent one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalizedReport {
    pub performance: Vec<Performance>,
    pub summary: Option<AnalyticsReport>,
}

/// The backend's acknowledgement of a text-to-speech request.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechAck {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn difficulty_parses_lowercase_names_only() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "Hard".parse::<Difficulty>(),
            Err(PortError::InvalidInput(_))
        ));
    }

    #[test]
    fn performance_validation_bounds_percentages() {
        let at = Utc.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
        let mut record = Performance::new("quiz_1", at);
        record.score = Some(100.0);
        record.completion_rate = Some(0.0);
        assert!(record.validate().is_ok());

        record.score = Some(101.0);
        assert!(record.validate().is_err());

        record.score = None;
        record.time_spent_secs = Some(-1.0);
        assert!(record.validate().is_err());
    }
}
