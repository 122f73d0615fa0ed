//! services/portal/src/views/mod.rs
//!
//! View models for the portal screens. Each one turns store state into the
//! plain data a host renders, and forwards user intents to the stores.

pub mod analytics;
pub mod content_detail;
pub mod dashboard;
pub mod library;
pub mod profile;

use learning_portal_core::domain::{Content, ContentKind, Difficulty};

pub use analytics::AnalyticsView;
pub use content_detail::{ContentDetail, ContentDetailView, DetailBody, QuizResult};
pub use dashboard::{Dashboard, DashboardOutcome};
pub use library::LibraryView;
pub use profile::ProfileEditor;

/// A catalog entry as shown in lists.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentCard {
    pub id: String,
    pub title: String,
    pub kind: ContentKind,
    pub difficulty: Difficulty,
    pub description: String,
    pub image_url: Option<String>,
    pub link: String,
}

impl ContentCard {
    pub fn from_content(content: &Content) -> Self {
        Self {
            id: content.id.clone(),
            title: content.title.clone(),
            kind: content.kind(),
            difficulty: content.difficulty,
            description: content.description.clone(),
            image_url: content.image_url.clone(),
            link: content_link(&content.id),
        }
    }
}

pub fn content_link(id: &str) -> String {
    format!("/content/{}", id)
}

/// `article_1` reads as `article 1`.
pub fn activity_label(activity: &str) -> String {
    activity.replacen('_', " ", 1)
}

/// Whole minutes, rounded to nearest.
pub fn minutes(seconds: f64) -> u64 {
    (seconds / 60.0).round().max(0.0) as u64
}
