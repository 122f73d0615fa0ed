//! services/portal/src/wire.rs
//!
//! The JSON records exchanged with the backend, shared by the HTTP client and
//! the mock backend. Records use camelCase names and also accept the
//! snake_case spellings older backends emit. Each record converts to and from
//! its pure domain counterpart.

use chrono::{DateTime, NaiveDate, Utc};
use learning_portal_core::domain::{
    AnalyticsReport, Content, ContentBody, ContentKind, Difficulty, ExerciseStyle, Performance,
    PerformanceMetrics, PersonalizedReport, Preferences, ProgressPoint, QuizQuestion, Stat, User,
};
use learning_portal_core::ports::{PortError, PortResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn malformed(what: &str, detail: impl std::fmt::Display) -> PortError {
    PortError::Unexpected(format!("malformed {} record: {}", what, detail))
}

/// Parses an optional difficulty, treating absence as the default level.
fn parse_difficulty(raw: Option<&str>, what: &str) -> PortResult<Difficulty> {
    match raw {
        None => Ok(Difficulty::default()),
        Some(s) => s.parse().map_err(|e| malformed(what, e)),
    }
}

//=========================================================================================
// Users and Auth
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(alias = "user_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default, alias = "preferred_topics")]
    pub preferred_topics: Vec<String>,
    #[serde(default, alias = "difficulty_level")]
    pub difficulty_level: Option<String>,
}

impl UserRecord {
    pub fn to_domain(self) -> PortResult<User> {
        Ok(User {
            difficulty_level: parse_difficulty(self.difficulty_level.as_deref(), "user")?,
            id: self.id,
            username: self.username,
            preferred_topics: self.preferred_topics,
        })
    }

    pub fn from_domain(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            preferred_topics: user.preferred_topics.clone(),
            difficulty_level: Some(user.difficulty_level.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub user_id: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /profile`. Either field may be omitted to leave it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PreferencesRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_topics: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
}

impl PreferencesRequest {
    pub fn from_domain(preferences: &Preferences) -> Self {
        Self {
            preferred_topics: Some(preferences.preferred_topics.clone()),
            difficulty_level: Some(preferences.difficulty_level.to_string()),
        }
    }
}

/// The `{ "message": ... }` body used for acknowledgements and errors.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//=========================================================================================
// Content
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestionRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "correct_answer")]
    pub correct_answer: String,
}

/// A flat content record. The variant fields that apply depend on `type`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "tts_enabled", alias = "tts_available", skip_serializing_if = "Option::is_none")]
    pub tts_enabled: Option<bool>,
    #[serde(default, alias = "stt_enabled", skip_serializing_if = "Option::is_none")]
    pub stt_enabled: Option<bool>,
    #[serde(default, alias = "image_url", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuizQuestionRecord>>,
}

impl ContentRecord {
    pub fn to_domain(self) -> PortResult<Content> {
        let kind: ContentKind = self
            .content_type
            .as_deref()
            .unwrap_or("article")
            .parse()
            .map_err(|e| malformed("content", e))?;
        let id = self.id;
        let missing = |field: &str| malformed("content", format!("{} has no {}", id, field));

        let body = match kind {
            ContentKind::Article => ContentBody::Article {
                text: self.text.ok_or_else(|| missing("text"))?,
            },
            ContentKind::Video => ContentBody::Video {
                url: self.url.ok_or_else(|| missing("url"))?,
                duration_secs: self.duration.unwrap_or(0),
            },
            ContentKind::Exercise | ContentKind::Game => ContentBody::Exercise {
                instructions: self.instructions.ok_or_else(|| missing("instructions"))?,
                style: if kind == ContentKind::Game {
                    ExerciseStyle::Game
                } else {
                    ExerciseStyle::Exercise
                },
            },
            ContentKind::Quiz => ContentBody::Quiz {
                questions: self
                    .questions
                    .unwrap_or_default()
                    .into_iter()
                    .map(|q| QuizQuestion {
                        id: q.id,
                        text: q.text,
                        options: q.options,
                        correct_answer: q.correct_answer,
                    })
                    .collect(),
            },
        };

        Ok(Content {
            difficulty: parse_difficulty(self.difficulty.as_deref(), "content")?,
            id,
            title: self.title,
            topic: self.topic,
            description: self.description,
            tts_enabled: self.tts_enabled.unwrap_or(false),
            stt_enabled: self.stt_enabled.unwrap_or(false),
            image_url: self.image_url,
            body,
        })
    }

    pub fn from_domain(content: &Content) -> Self {
        let mut record = Self {
            id: content.id.clone(),
            title: content.title.clone(),
            content_type: Some(content.kind().to_string()),
            topic: content.topic.clone(),
            difficulty: Some(content.difficulty.to_string()),
            description: content.description.clone(),
            tts_enabled: content.tts_enabled.then_some(true),
            stt_enabled: content.stt_enabled.then_some(true),
            image_url: content.image_url.clone(),
            text: None,
            url: None,
            duration: None,
            instructions: None,
            questions: None,
        };
        match &content.body {
            ContentBody::Article { text } => record.text = Some(text.clone()),
            ContentBody::Video { url, duration_secs } => {
                record.url = Some(url.clone());
                record.duration = Some(*duration_secs);
            }
            ContentBody::Exercise { instructions, .. } => {
                record.instructions = Some(instructions.clone())
            }
            ContentBody::Quiz { questions } => {
                record.questions = Some(
                    questions
                        .iter()
                        .map(|q| QuizQuestionRecord {
                            id: q.id.clone(),
                            text: q.text.clone(),
                            options: q.options.clone(),
                            correct_answer: q.correct_answer.clone(),
                        })
                        .collect(),
                )
            }
        }
        record
    }
}

pub fn contents_to_domain(records: Vec<ContentRecord>) -> PortResult<Vec<Content>> {
    records.into_iter().map(ContentRecord::to_domain).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationsEnvelope {
    pub recommendations: Vec<ContentRecord>,
}

//=========================================================================================
// Performance and Analytics
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    pub timestamp: DateTime<Utc>,
    pub activity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, alias = "time_spent", skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<f64>,
    #[serde(default, alias = "completion_rate", skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<f64>,
    #[serde(default, alias = "difficulty_level", skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
}

impl PerformanceRecord {
    pub fn to_domain(self) -> PortResult<Performance> {
        let difficulty_level = match self.difficulty_level.as_deref() {
            Some(raw) => Some(raw.parse().map_err(|e| malformed("performance", e))?),
            None => None,
        };
        Ok(Performance {
            timestamp: self.timestamp,
            activity: self.activity,
            score: self.score,
            time_spent_secs: self.time_spent,
            completion_rate: self.completion_rate,
            difficulty_level,
        })
    }

    pub fn from_domain(record: &Performance) -> Self {
        Self {
            timestamp: record.timestamp,
            activity: record.activity.clone(),
            score: record.score,
            time_spent: record.time_spent_secs,
            completion_rate: record.completion_rate,
            difficulty_level: record.difficulty_level.map(|d| d.to_string()),
        }
    }
}

/// The metric half of `POST /performance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MetricsRecord {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub time_spent: Option<f64>,
    #[serde(default)]
    pub completion_rate: Option<f64>,
    #[serde(default)]
    pub difficulty_level: Option<String>,
}

impl MetricsRecord {
    pub fn from_domain(metrics: &PerformanceMetrics) -> Self {
        Self {
            score: metrics.score,
            time_spent: metrics.time_spent_secs,
            completion_rate: metrics.completion_rate,
            difficulty_level: metrics.difficulty_level.map(|d| d.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerformanceRequest {
    pub activity_type: String,
    pub metrics: MetricsRecord,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct StatRecord {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl From<Stat> for StatRecord {
    fn from(stat: Stat) -> Self {
        Self {
            mean: stat.mean,
            min: stat.min,
            max: stat.max,
        }
    }
}

impl From<StatRecord> for Stat {
    fn from(record: StatRecord) -> Self {
        Self {
            mean: record.mean,
            min: record.min,
            max: record.max,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgressPointRecord {
    pub date: NaiveDate,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReportRecord {
    pub scores: StatRecord,
    #[serde(alias = "time_spent")]
    pub time_spent: StatRecord,
    #[serde(alias = "completion_rate")]
    pub completion_rate: StatRecord,
    #[serde(default, alias = "progress_over_time")]
    pub progress_over_time: Vec<ProgressPointRecord>,
}

fn progress_to_domain(points: Vec<ProgressPointRecord>) -> Vec<ProgressPoint> {
    points
        .into_iter()
        .map(|p| ProgressPoint {
            date: p.date,
            score: p.score,
        })
        .collect()
}

fn progress_from_domain(points: &[ProgressPoint]) -> Vec<ProgressPointRecord> {
    points
        .iter()
        .map(|p| ProgressPointRecord {
            date: p.date,
            score: p.score,
        })
        .collect()
}

impl AnalyticsReportRecord {
    pub fn to_domain(self) -> AnalyticsReport {
        AnalyticsReport {
            scores: self.scores.into(),
            time_spent: self.time_spent.into(),
            completion_rate: self.completion_rate.into(),
            progress_over_time: progress_to_domain(self.progress_over_time),
        }
    }

    pub fn from_domain(report: &AnalyticsReport) -> Self {
        Self {
            scores: report.scores.into(),
            time_spent: report.time_spent.into(),
            completion_rate: report.completion_rate.into(),
            progress_over_time: progress_from_domain(&report.progress_over_time),
        }
    }
}

/// A user's history plus, when available, its summary fields side by side.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedReportRecord {
    #[serde(default)]
    pub performance: Vec<PerformanceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<StatRecord>,
    #[serde(default, alias = "time_spent", skip_serializing_if = "Option::is_none")]
    pub time_spent: Option<StatRecord>,
    #[serde(default, alias = "completion_rate", skip_serializing_if = "Option::is_none")]
    pub completion_rate: Option<StatRecord>,
    #[serde(default, alias = "progress_over_time")]
    pub progress_over_time: Vec<ProgressPointRecord>,
}

impl PersonalizedReportRecord {
    pub fn to_domain(self) -> PortResult<PersonalizedReport> {
        let performance = self
            .performance
            .into_iter()
            .map(PerformanceRecord::to_domain)
            .collect::<PortResult<Vec<_>>>()?;
        let summary = match (self.scores, self.time_spent, self.completion_rate) {
            (Some(scores), Some(time_spent), Some(completion_rate)) => Some(AnalyticsReport {
                scores: scores.into(),
                time_spent: time_spent.into(),
                completion_rate: completion_rate.into(),
                progress_over_time: progress_to_domain(self.progress_over_time),
            }),
            _ => None,
        };
        Ok(PersonalizedReport {
            performance,
            summary,
        })
    }

    pub fn from_domain(report: &PersonalizedReport) -> Self {
        let summary = report.summary.as_ref();
        Self {
            performance: report
                .performance
                .iter()
                .map(PerformanceRecord::from_domain)
                .collect(),
            scores: summary.map(|s| s.scores.into()),
            time_spent: summary.map(|s| s.time_spent.into()),
            completion_rate: summary.map(|s| s.completion_rate.into()),
            progress_over_time: summary
                .map(|s| progress_from_domain(&s.progress_over_time))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PersonalizedReportEnvelope {
    pub report: PersonalizedReportRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OverallReportEnvelope {
    pub overall_report: AnalyticsReportRecord,
}

//=========================================================================================
// Accessibility
//=========================================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TtsRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptResponse {
    pub transcript: String,
}
