#![allow(dead_code)]

use async_trait::async_trait;
use learning_portal_core::catalog::{sample_catalog, sample_performance, sample_report};
use learning_portal_core::domain::{
    AnalyticsReport, AuthState, AuthStatus, Content, Difficulty, PerformanceMetrics,
    PersonalizedReport, Preferences, User,
};
use learning_portal_core::ports::{
    AnalyticsService, AuthService, ContentService, PortError, PortResult, RecognitionEvent,
    RecognitionEvents, RecognitionSettings, SpeechRecognizer, SpeechSynthesizer, SynthesisEvent,
    SynthesisEvents, Utterance,
};
use portal_lib::adapters::MemoryTokenStore;
use portal_lib::stores::{AuthStore, ContentStore};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{watch, Notify};

pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "token-123";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn sample_user() -> User {
    User {
        id: "user-1".to_string(),
        username: "alice".to_string(),
        preferred_topics: vec!["reading_strategies".to_string()],
        difficulty_level: Difficulty::Medium,
    }
}

//=========================================================================================
// Backend Fakes
//=========================================================================================

/// An auth backend with one account (`alice` / `secret`).
pub struct FakeAuth {
    pub account: Mutex<Option<User>>,
    /// When set, `get_profile` rejects the token.
    pub reject_profile: AtomicBool,
    pub fail_updates: AtomicBool,
    pub updates: Mutex<Vec<Preferences>>,
    /// Status seen by the store at the moment `login` was called.
    pub status_at_login: Mutex<Option<AuthStatus>>,
    /// Every request the store sends, whatever the outcome.
    pub calls: AtomicUsize,
    watcher: Mutex<Option<watch::Receiver<AuthState>>>,
    gate: Mutex<Option<(&'static str, Arc<Gate>)>>,
}

/// Parks one backend operation until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            account: Mutex::new(Some(sample_user())),
            reject_profile: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            updates: Mutex::new(Vec::new()),
            status_at_login: Mutex::new(None),
            calls: AtomicUsize::new(0),
            watcher: Mutex::new(None),
            gate: Mutex::new(None),
        }
    }

    /// The next call to `operation` waits on the returned gate.
    pub fn hold(&self, operation: &'static str) -> Arc<Gate> {
        let gate = Arc::new(Gate::default());
        *self.gate.lock().unwrap() = Some((operation, gate.clone()));
        gate
    }

    async fn pass(&self, operation: &'static str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let held = {
            let mut slot = self.gate.lock().unwrap();
            match slot.as_ref() {
                Some((name, _)) if *name == operation => slot.take().map(|(_, gate)| gate),
                _ => None,
            }
        };
        if let Some(gate) = held {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    pub fn without_account() -> Self {
        let fake = Self::new();
        *fake.account.lock().unwrap() = None;
        fake
    }

    pub fn watch(&self, store: &AuthStore) {
        *self.watcher.lock().unwrap() = Some(store.subscribe());
    }

    fn current(&self) -> Option<User> {
        self.account.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn login(&self, username: &str, password: &str) -> PortResult<String> {
        self.pass("login").await;
        if let Some(watcher) = self.watcher.lock().unwrap().as_ref() {
            *self.status_at_login.lock().unwrap() = Some(watcher.borrow().status);
        }
        match self.current() {
            Some(user) if user.username == username && password == PASSWORD => {
                Ok(TOKEN.to_string())
            }
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn register(&self, username: &str, _password: &str) -> PortResult<String> {
        self.pass("register").await;
        let mut account = self.account.lock().unwrap();
        if account.as_ref().map(|u| u.username.as_str()) == Some(username) {
            return Err(PortError::Conflict("Username already exists".to_string()));
        }
        *account = Some(User {
            id: "user-2".to_string(),
            username: username.to_string(),
            preferred_topics: Vec::new(),
            difficulty_level: Difficulty::Medium,
        });
        Ok("user-2".to_string())
    }

    async fn get_profile(&self) -> PortResult<User> {
        self.pass("get_profile").await;
        if self.reject_profile.load(Ordering::SeqCst) {
            return Err(PortError::Unauthorized);
        }
        self.current().ok_or(PortError::Unauthorized)
    }

    async fn update_profile(&self, preferences: &Preferences) -> PortResult<User> {
        self.pass("update_profile").await;
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("backend down".to_string()));
        }
        self.updates.lock().unwrap().push(preferences.clone());
        let mut account = self.account.lock().unwrap();
        let user = account.as_mut().ok_or(PortError::Unauthorized)?;
        user.preferred_topics = preferences.preferred_topics.clone();
        user.difficulty_level = preferences.difficulty_level;
        Ok(user.clone())
    }
}

pub struct FakeContent {
    pub catalog: Vec<Content>,
    pub recommended: Mutex<Vec<Content>>,
    pub fail_catalog: AtomicBool,
    pub fail_recommendations: AtomicBool,
    pub recommendation_calls: AtomicUsize,
}

impl FakeContent {
    pub fn new() -> Self {
        let catalog = sample_catalog();
        let recommended = catalog.iter().take(2).cloned().collect();
        Self {
            catalog,
            recommended: Mutex::new(recommended),
            fail_catalog: AtomicBool::new(false),
            fail_recommendations: AtomicBool::new(false),
            recommendation_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ContentService for FakeContent {
    async fn list_content(&self) -> PortResult<Vec<Content>> {
        if self.fail_catalog.load(Ordering::SeqCst) {
            return Err(PortError::Transport("connection refused".to_string()));
        }
        Ok(self.catalog.clone())
    }

    async fn get_content(&self, content_id: &str) -> PortResult<Content> {
        self.catalog
            .iter()
            .find(|c| c.id == content_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(content_id.to_string()))
    }

    async fn recommendations(&self) -> PortResult<Vec<Content>> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_recommendations.load(Ordering::SeqCst) {
            return Err(PortError::Unauthorized);
        }
        Ok(self.recommended.lock().unwrap().clone())
    }
}

pub struct FakeAnalytics {
    pub report: PersonalizedReport,
    pub fail_report: AtomicBool,
    pub reject_records: AtomicBool,
    pub recorded: Mutex<Vec<(String, PerformanceMetrics)>>,
}

impl FakeAnalytics {
    pub fn new() -> Self {
        Self {
            report: PersonalizedReport {
                performance: sample_performance(),
                summary: Some(sample_report()),
            },
            fail_report: AtomicBool::new(false),
            reject_records: AtomicBool::new(false),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self {
            report: PersonalizedReport::default(),
            ..Self::new()
        }
    }
}

#[async_trait]
impl AnalyticsService for FakeAnalytics {
    async fn personalized_report(&self) -> PortResult<PersonalizedReport> {
        if self.fail_report.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("500 Internal Server Error".to_string()));
        }
        Ok(self.report.clone())
    }

    async fn overall_report(&self) -> PortResult<AnalyticsReport> {
        self.report
            .summary
            .clone()
            .ok_or_else(|| PortError::NotFound("No performance data found".to_string()))
    }

    async fn record_performance(
        &self,
        activity_type: &str,
        metrics: &PerformanceMetrics,
    ) -> PortResult<()> {
        if self.reject_records.load(Ordering::SeqCst) {
            return Err(PortError::InvalidInput("rejected".to_string()));
        }
        self.recorded
            .lock()
            .unwrap()
            .push((activity_type.to_string(), metrics.clone()));
        Ok(())
    }
}

pub struct Harness {
    pub auth_backend: Arc<FakeAuth>,
    pub content_backend: Arc<FakeContent>,
    pub analytics_backend: Arc<FakeAnalytics>,
    pub tokens: Arc<MemoryTokenStore>,
    pub auth: AuthStore,
    pub content: ContentStore,
}

impl Harness {
    pub fn new() -> Self {
        Self::with(FakeAuth::new(), FakeAnalytics::new(), MemoryTokenStore::new())
    }

    pub fn with(auth: FakeAuth, analytics: FakeAnalytics, tokens: MemoryTokenStore) -> Self {
        init_tracing();
        let auth_backend = Arc::new(auth);
        let content_backend = Arc::new(FakeContent::new());
        let analytics_backend = Arc::new(analytics);
        let tokens = Arc::new(tokens);
        let auth = AuthStore::new(auth_backend.clone(), tokens.clone());
        let content = ContentStore::new(content_backend.clone(), analytics_backend.clone());
        Self {
            auth_backend,
            content_backend,
            analytics_backend,
            tokens,
            auth,
            content,
        }
    }
}

//=========================================================================================
// Speech Fakes
//=========================================================================================

pub struct FakeSynthesizer {
    pub available: bool,
    pub spoken: Mutex<Vec<Utterance>>,
    pub volumes: Mutex<Vec<f32>>,
    pub cancels: AtomicUsize,
    events: Mutex<Option<SynthesisEvents>>,
}

impl FakeSynthesizer {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            spoken: Mutex::new(Vec::new()),
            volumes: Mutex::new(Vec::new()),
            cancels: AtomicUsize::new(0),
            events: Mutex::new(None),
        }
    }

    pub fn emit(&self, event: SynthesisEvent) {
        if let Some(events) = self.events.lock().unwrap().as_ref() {
            let _ = events.unbounded_send(event);
        }
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn speak(&self, utterance: Utterance, events: SynthesisEvents) -> PortResult<()> {
        self.spoken.lock().unwrap().push(utterance);
        *self.events.lock().unwrap() = Some(events);
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().take();
    }

    fn set_volume(&self, volume: f32) {
        self.volumes.lock().unwrap().push(volume);
    }
}

pub struct FakeRecognizer {
    pub available: bool,
    pub started: Mutex<Vec<RecognitionSettings>>,
    pub stops: AtomicUsize,
    events: Mutex<Option<RecognitionEvents>>,
}

impl FakeRecognizer {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            started: Mutex::new(Vec::new()),
            stops: AtomicUsize::new(0),
            events: Mutex::new(None),
        }
    }

    pub fn emit(&self, event: RecognitionEvent) {
        if let Some(events) = self.events.lock().unwrap().as_ref() {
            let _ = events.unbounded_send(event);
        }
    }

    pub fn hear(&self, text: &str) {
        self.emit(RecognitionEvent::Result(text.to_string()));
    }
}

impl SpeechRecognizer for FakeRecognizer {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&self, settings: &RecognitionSettings, events: RecognitionEvents) -> PortResult<()> {
        self.started.lock().unwrap().push(settings.clone());
        *self.events.lock().unwrap() = Some(events);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().take();
    }
}
