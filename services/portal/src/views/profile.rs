//! services/portal/src/views/profile.rs
//!
//! Preference editor for the signed-in learner.

use learning_portal_core::domain::{AuthState, Difficulty, KNOWN_TOPICS};
use learning_portal_core::ports::PortResult;
use tracing::info;

use crate::stores::{AuthStore, ContentStore};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEditor {
    pub username: String,
    pub preferred_topics: Vec<String>,
    pub difficulty_level: Difficulty,
}

impl ProfileEditor {
    /// Seeds the editor from the current user. `None` when nobody is signed in.
    pub fn from_auth(state: &AuthState) -> Option<Self> {
        let user = state.user.as_ref()?;
        Some(Self {
            username: user.username.clone(),
            preferred_topics: user.preferred_topics.clone(),
            difficulty_level: user.difficulty_level,
        })
    }

    /// Avatar letter.
    pub fn initial(&self) -> Option<char> {
        self.username
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
    }

    pub fn is_selected(&self, topic: &str) -> bool {
        self.preferred_topics.iter().any(|t| t == topic)
    }

    pub fn toggle_topic(&mut self, topic: &str) {
        if self.is_selected(topic) {
            self.preferred_topics.retain(|t| t != topic);
        } else {
            self.preferred_topics.push(topic.to_string());
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty_level = difficulty;
    }

    pub fn topic_options(&self) -> Vec<(&'static str, bool)> {
        KNOWN_TOPICS
            .iter()
            .map(|topic| (*topic, self.is_selected(topic)))
            .collect()
    }

    /// Saves the preferences, then refreshes recommendations against them.
    pub async fn save(&self, auth: &AuthStore, content: &ContentStore) -> PortResult<()> {
        auth.update_user_preferences(self.preferred_topics.clone(), self.difficulty_level)
            .await?;
        content
            .update_recommendations(&self.preferred_topics, self.difficulty_level)
            .await?;
        info!("Preferences saved for {}", self.username);
        Ok(())
    }
}
