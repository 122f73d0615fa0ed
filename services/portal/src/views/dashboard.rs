//! services/portal/src/views/dashboard.rs
//!
//! The signed-in landing screen.

use learning_portal_core::analytics::average_score;
use learning_portal_core::domain::{AuthState, AuthStatus, Difficulty, Performance};

use crate::stores::ContentState;
use crate::views::{activity_label, content_link, minutes, ContentCard};

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardOutcome {
    /// Nobody is signed in; the host should navigate to the login screen.
    RedirectToLogin,
    /// A session is being resolved; render nothing yet.
    Pending,
    Ready(Dashboard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub greeting: String,
    pub activities_completed: usize,
    pub average_score: Option<f64>,
    pub continue_learning: Option<ContinueLearning>,
    pub recommended: Vec<ContentCard>,
}

/// The card pointing back at the most recent activity.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueLearning {
    pub activity: String,
    pub prompt: String,
    pub completion_rate: f64,
    pub minutes_spent: u64,
    pub difficulty: Difficulty,
    pub link: String,
}

impl ContinueLearning {
    fn from_performance(last: &Performance) -> Self {
        Self {
            activity: last.activity.clone(),
            prompt: format!(
                "Continue your progress with {}",
                activity_label(&last.activity)
            ),
            completion_rate: last.completion_rate.unwrap_or(0.0),
            minutes_spent: last.time_spent_secs.map(minutes).unwrap_or(0),
            difficulty: last.difficulty_level.unwrap_or_default(),
            link: content_link(&last.activity),
        }
    }
}

impl Dashboard {
    pub fn build(auth: &AuthState, content: &ContentState) -> DashboardOutcome {
        match auth.status {
            AuthStatus::Unauthenticated => DashboardOutcome::RedirectToLogin,
            AuthStatus::Loading => DashboardOutcome::Pending,
            AuthStatus::Authenticated => {
                let username = auth
                    .user
                    .as_ref()
                    .map(|u| u.username.as_str())
                    .unwrap_or_default();
                DashboardOutcome::Ready(Dashboard {
                    greeting: format!("Welcome back, {}!", username),
                    activities_completed: content.performance.len(),
                    average_score: average_score(&content.performance),
                    // Most recently recorded, not most recent timestamp.
                    continue_learning: content
                        .performance
                        .last()
                        .map(ContinueLearning::from_performance),
                    recommended: content
                        .recommended
                        .iter()
                        .map(ContentCard::from_content)
                        .collect(),
                })
            }
        }
    }
}
