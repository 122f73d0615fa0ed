//! services/portal/src/stores/auth.rs
//!
//! The session store: the single source of truth for who is signed in.
//! State changes are published on a `watch` channel so views can follow them.

use learning_portal_core::domain::{AuthState, AuthStatus, Difficulty, Preferences, User};
use learning_portal_core::ports::{AuthService, PortResult, TokenStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, warn};

pub struct AuthStore {
    auth: Arc<dyn AuthService>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<AuthState>,
    /// Serializes preference updates so the last one issued is the last one applied.
    preferences_lock: Mutex<()>,
    /// Bumped by every logout. Requests that started under an older value
    /// must not install their result.
    logouts: AtomicU64,
}

impl AuthStore {
    /// Creates an unauthenticated store without touching the persisted token.
    pub fn new(auth: Arc<dyn AuthService>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            auth,
            tokens,
            state: watch::Sender::new(AuthState::unauthenticated()),
            preferences_lock: Mutex::new(()),
            logouts: AtomicU64::new(0),
        }
    }

    /// Creates the store and resolves any persisted session before returning.
    pub async fn load(auth: Arc<dyn AuthService>, tokens: Arc<dyn TokenStore>) -> Self {
        let store = Self::new(auth, tokens);
        store.restore_session().await;
        store
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Rehydrates the session from the persisted token, if there is one.
    ///
    /// A token the backend no longer accepts is removed and the store falls
    /// back to unauthenticated without reporting an error.
    pub async fn restore_session(&self) -> AuthStatus {
        let Some(token) = self.tokens.load() else {
            return self.status();
        };
        let epoch = self.epoch();

        self.state.send_modify(|state| {
            state.token = Some(token.clone());
            state.status = AuthStatus::Loading;
        });

        match self.auth.get_profile().await {
            Ok(user) => {
                let username = user.username.clone();
                if self.install_session(epoch, &token, user) {
                    info!("Restored session for {}", username);
                }
            }
            Err(_) if self.epoch() != epoch => {
                debug!("Signed out while the session was being restored");
            }
            Err(e) => {
                warn!("Stored session could not be restored: {}", e);
                self.reset();
            }
        }
        self.status()
    }

    pub async fn login(&self, username: &str, password: &str) -> PortResult<()> {
        let epoch = self.epoch();
        self.state.send_modify(|state| state.status = AuthStatus::Loading);
        if let Err(e) = self.establish_session(epoch, username, password).await {
            error!("Login failed: {}", e);
            self.reset_if_current(epoch);
            return Err(e);
        }
        Ok(())
    }

    /// Creates the account, then signs in with the same credentials.
    pub async fn register(&self, username: &str, password: &str) -> PortResult<()> {
        let epoch = self.epoch();
        self.state.send_modify(|state| state.status = AuthStatus::Loading);
        let result = async {
            let user_id = self.auth.register(username, password).await?;
            debug!("Registered {} as {}", username, user_id);
            self.establish_session(epoch, username, password).await
        }
        .await;

        if let Err(e) = result {
            error!("Registration failed: {}", e);
            self.reset_if_current(epoch);
            return Err(e);
        }
        Ok(())
    }

    /// Forgets the session locally. No request is sent to the backend.
    pub fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        self.reset();
        info!("Signed out");
    }

    /// Pushes new preferences and refreshes the profile. A no-op when signed out.
    ///
    /// On failure the local user is left as it was.
    pub async fn update_user_preferences(
        &self,
        preferred_topics: Vec<String>,
        difficulty_level: Difficulty,
    ) -> PortResult<()> {
        let _guard = self.preferences_lock.lock().await;
        let (user_present, captured) = {
            let state = self.state.borrow();
            (state.user.is_some(), state.token.clone())
        };
        if !user_present {
            return Ok(());
        }
        let epoch = self.epoch();
        let preferences = Preferences {
            preferred_topics,
            difficulty_level,
        };
        let result = async {
            self.auth.update_profile(&preferences).await?;
            self.auth.get_profile().await
        }
        .await;

        match result {
            Ok(profile) => {
                let applied = self.state.send_if_modified(|state| {
                    let current = self.epoch() == epoch
                        && state.status == AuthStatus::Authenticated
                        && state.token == captured;
                    if current {
                        state.user = Some(profile);
                    }
                    current
                });
                if !applied {
                    debug!("Session changed during the preference update; dropping the refreshed profile");
                }
                Ok(())
            }
            Err(e) => {
                error!("Failed to update preferences: {}", e);
                Err(e)
            }
        }
    }

    async fn establish_session(&self, epoch: u64, username: &str, password: &str) -> PortResult<()> {
        let token = self.auth.login(username, password).await?;
        if self.epoch() != epoch {
            debug!("Signed out before the login for {} completed", username);
            return Ok(());
        }
        self.tokens.save(&token)?;
        let profile = self.auth.get_profile().await?;
        let username = profile.username.clone();
        if self.install_session(epoch, &token, profile) {
            info!("Signed in as {}", username);
        } else {
            debug!("Signed out before the login for {} completed", username);
        }
        Ok(())
    }

    fn epoch(&self) -> u64 {
        self.logouts.load(Ordering::SeqCst)
    }

    /// Installs a signed-in state unless a logout happened after `epoch` was taken.
    /// A stale token left in persistence by that race is removed.
    fn install_session(&self, epoch: u64, token: &str, user: User) -> bool {
        let installed = self.state.send_if_modified(|state| {
            if self.epoch() != epoch {
                return false;
            }
            *state = AuthState {
                user: Some(user),
                status: AuthStatus::Authenticated,
                token: Some(token.to_string()),
            };
            true
        });
        if !installed && self.tokens.load().as_deref() == Some(token) {
            if let Err(e) = self.tokens.clear() {
                warn!("Failed to remove the persisted token: {}", e);
            }
        }
        installed
    }

    fn reset_if_current(&self, epoch: u64) {
        if self.epoch() == epoch {
            self.reset();
        }
    }

    fn reset(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Failed to remove the persisted token: {}", e);
        }
        self.state.send_replace(AuthState::unauthenticated());
    }
}
