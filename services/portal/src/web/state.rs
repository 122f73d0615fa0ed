//! services/portal/src/web/state.rs
//!
//! Shared in-memory state for the mock backend.

use crate::config::Config;
use chrono::{DateTime, Utc};
use learning_portal_core::catalog::sample_catalog;
use learning_portal_core::domain::{Content, Difficulty, Performance, User};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

//=========================================================================================
// Accounts and Sessions
//=========================================================================================

/// A registered learner and everything the backend keeps for them.
#[derive(Debug, Clone)]
pub struct Account {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub preferred_topics: Vec<String>,
    pub difficulty_level: Difficulty,
    pub performance: Vec<Performance>,
}

impl Account {
    pub fn new(username: &str, password_hash: String) -> Self {
        Self {
            user_id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash,
            preferred_topics: Vec::new(),
            difficulty_level: Difficulty::Medium,
            performance: Vec::new(),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.user_id.clone(),
            username: self.username.clone(),
            preferred_topics: self.preferred_topics.clone(),
            difficulty_level: self.difficulty_level,
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// The id of the signed-in user, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

//=========================================================================================
// BackendState (Shared Across All Requests)
//=========================================================================================

/// Created once at startup and passed to all handlers.
pub struct BackendState {
    pub config: Arc<Config>,
    pub catalog: Vec<Content>,
    /// Keyed by user id.
    pub accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
}

impl BackendState {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_catalog(config, sample_catalog())
    }

    pub fn with_catalog(config: Arc<Config>, catalog: Vec<Content>) -> Self {
        Self {
            config,
            catalog,
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issues an opaque bearer token for the user, valid for the configured lifetime.
    pub async fn issue_token(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id: user_id.to_string(),
            expires_at: Utc::now() + self.config.mock_token_ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolves a token to its user id. Expired tokens are forgotten.
    pub async fn validate_token(&self, token: &str) -> Option<String> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get(token)?;
        if session.expires_at <= Utc::now() {
            sessions.remove(token);
            return None;
        }
        Some(session.user_id.clone())
    }

    pub fn find_content(&self, id: &str) -> Option<&Content> {
        self.catalog.iter().find(|item| item.id == id)
    }
}
