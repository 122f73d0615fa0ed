//! services/portal/src/views/content_detail.rs
//!
//! A single opened catalog item. The detail keeps the time it was opened so
//! that closing it can record how long the learner spent on it.

use chrono::{DateTime, Utc};
use learning_portal_core::domain::{
    Content, ContentBody, ContentKind, Difficulty, ExerciseStyle, Performance,
};
use learning_portal_core::ports::{PortError, PortResult};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::stores::ContentStore;

pub const VIDEO_TRANSCRIPT: &str = "This is a sample transcript for the video about auditory processing disorders. In this video, we explain what auditory processing disorder is, its symptoms, and strategies to help manage it.";

const DEFAULT_ESTIMATED_TIME: &str = "5-10 min";

#[derive(Debug, Clone, PartialEq)]
pub struct QuizItem {
    pub number: usize,
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailBody {
    Article {
        text: String,
        read_aloud: bool,
    },
    Video {
        url: String,
        duration: String,
        transcript: Option<&'static str>,
    },
    Exercise {
        instructions: String,
        style: ExerciseStyle,
        accepts_speech: bool,
        answer: Option<String>,
    },
    Quiz {
        questions: Vec<QuizItem>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentDetailView {
    pub title: String,
    pub kind: ContentKind,
    pub difficulty: Difficulty,
    pub description: String,
    pub image_url: Option<String>,
    pub estimated_time: String,
    pub body: DetailBody,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    pub score: f64,
}

pub struct ContentDetail {
    content: Content,
    opened_at: DateTime<Utc>,
    speech_answer: Option<String>,
    answers: HashMap<String, String>,
}

/// `m:ss`
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

impl ContentDetail {
    /// Opens the item from the loaded catalog. `None` means not found.
    pub fn open(store: &ContentStore, id: &str, now: DateTime<Utc>) -> Option<Self> {
        let content = store.get_content_by_id(id)?;
        debug!("Opened {}", content.id);
        Some(Self::new(content, now))
    }

    pub fn new(content: Content, opened_at: DateTime<Utc>) -> Self {
        Self {
            content,
            opened_at,
            speech_answer: None,
            answers: HashMap::new(),
        }
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The text a read-aloud control should speak, when the item offers one.
    pub fn read_aloud_text(&self) -> Option<&str> {
        if !self.content.tts_enabled {
            return None;
        }
        match &self.content.body {
            ContentBody::Article { text } => Some(text),
            ContentBody::Video { .. } => Some(VIDEO_TRANSCRIPT),
            ContentBody::Exercise { .. } | ContentBody::Quiz { .. } => None,
        }
    }

    pub fn accepts_speech(&self) -> bool {
        self.content.stt_enabled && matches!(self.content.body, ContentBody::Exercise { .. })
    }

    /// Stores a spoken answer. Meant as the speech-to-text submit callback.
    pub fn set_speech_answer(&mut self, transcript: &str) {
        self.speech_answer = Some(transcript.to_string());
    }

    pub fn speech_answer(&self) -> Option<&str> {
        self.speech_answer.as_deref()
    }

    pub fn estimated_time(&self) -> String {
        match &self.content.body {
            ContentBody::Video { duration_secs, .. } => format!("{} min", duration_secs / 60),
            _ => DEFAULT_ESTIMATED_TIME.to_string(),
        }
    }

    /// Selects an option for a quiz question. Picking again replaces the choice.
    pub fn select_answer(&mut self, question_id: &str, option: &str) -> PortResult<()> {
        let question = self
            .content
            .questions()
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| PortError::InvalidInput(format!("unknown question {}", question_id)))?;
        if !question.options.iter().any(|o| o == option) {
            return Err(PortError::InvalidInput(format!(
                "{} is not an option for {}",
                option, question_id
            )));
        }
        self.answers
            .insert(question_id.to_string(), option.to_string());
        Ok(())
    }

    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Grades the current selections. `None` unless this is a quiz with questions.
    pub fn grade_quiz(&self) -> Option<QuizResult> {
        let questions = self.content.questions();
        if questions.is_empty() {
            return None;
        }
        let correct = questions
            .iter()
            .filter(|q| self.selected(&q.id) == Some(q.correct_answer.as_str()))
            .count();
        let total = questions.len();
        Some(QuizResult {
            correct,
            total,
            score: correct as f64 * 100.0 / total as f64,
        })
    }

    /// Grades the quiz and records the result as a performance entry.
    pub async fn submit_quiz(
        &self,
        store: &ContentStore,
        now: DateTime<Utc>,
    ) -> PortResult<QuizResult> {
        let result = self
            .grade_quiz()
            .ok_or_else(|| PortError::InvalidInput(format!("{} is not a quiz", self.content.id)))?;
        let answered = self.answers.len() as f64 * 100.0 / result.total as f64;

        let mut record = Performance::new(self.content.id.clone(), now);
        record.score = Some(result.score);
        record.time_spent_secs = Some(self.elapsed_secs(now));
        record.completion_rate = Some(answered.min(100.0));
        record.difficulty_level = Some(self.content.difficulty);
        store.record_performance(record).await?;

        info!(
            "Quiz {} submitted: {}/{} correct",
            self.content.id, result.correct, result.total
        );
        Ok(result)
    }

    /// Leaves the item, recording the time spent with full completion.
    pub async fn close(self, store: &ContentStore, now: DateTime<Utc>) -> PortResult<()> {
        let mut record = Performance::new(self.content.id.clone(), now);
        record.time_spent_secs = Some(self.elapsed_secs(now));
        record.completion_rate = Some(100.0);
        record.difficulty_level = Some(self.content.difficulty);
        store.record_performance(record).await
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.opened_at).num_milliseconds() as f64 / 1000.0).max(0.0)
    }

    pub fn view(&self) -> ContentDetailView {
        let content = &self.content;
        let body = match &content.body {
            ContentBody::Article { text } => DetailBody::Article {
                text: text.clone(),
                read_aloud: content.tts_enabled,
            },
            ContentBody::Video { url, duration_secs } => DetailBody::Video {
                url: url.clone(),
                duration: format_duration(*duration_secs),
                transcript: content.tts_enabled.then_some(VIDEO_TRANSCRIPT),
            },
            ContentBody::Exercise {
                instructions,
                style,
            } => DetailBody::Exercise {
                instructions: instructions.clone(),
                style: *style,
                accepts_speech: content.stt_enabled,
                answer: self.speech_answer.clone(),
            },
            ContentBody::Quiz { questions } => DetailBody::Quiz {
                questions: questions
                    .iter()
                    .enumerate()
                    .map(|(index, q)| QuizItem {
                        number: index + 1,
                        id: q.id.clone(),
                        prompt: q.text.clone(),
                        options: q.options.clone(),
                        selected: self.answers.get(&q.id).cloned(),
                    })
                    .collect(),
            },
        };

        ContentDetailView {
            title: content.title.clone(),
            kind: content.kind(),
            difficulty: content.difficulty,
            description: content.description.clone(),
            image_url: content.image_url.clone(),
            estimated_time: self.estimated_time(),
            body,
        }
    }
}
