//! services/portal/src/stores/content.rs
//!
//! The content store: catalog, recommendations and the learner's performance
//! history, loaded best-effort at start and updated through its mutators.

use learning_portal_core::domain::{AnalyticsReport, Content, Difficulty, Performance};
use learning_portal_core::ports::{AnalyticsService, ContentService, PortError, PortResult};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    pub all_content: Vec<Content>,
    pub recommended: Vec<Content>,
    /// Arrival order; views sort by timestamp where they need to.
    pub performance: Vec<Performance>,
    pub report: Option<AnalyticsReport>,
}

/// Which parts of the initial load succeeded, with the item count of each.
#[derive(Debug)]
pub struct LoadReport {
    pub catalog: PortResult<usize>,
    pub recommendations: PortResult<usize>,
    pub performance: PortResult<usize>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.failures().is_empty()
    }

    pub fn failures(&self) -> Vec<(&'static str, &PortError)> {
        [
            ("catalog", &self.catalog),
            ("recommendations", &self.recommendations),
            ("performance", &self.performance),
        ]
        .into_iter()
        .filter_map(|(part, result)| result.as_ref().err().map(|e| (part, e)))
        .collect()
    }
}

pub struct ContentStore {
    content: Arc<dyn ContentService>,
    analytics: Arc<dyn AnalyticsService>,
    state: watch::Sender<ContentState>,
}

impl ContentStore {
    pub fn new(content: Arc<dyn ContentService>, analytics: Arc<dyn AnalyticsService>) -> Self {
        Self {
            content,
            analytics,
            state: watch::Sender::new(ContentState::default()),
        }
    }

    pub fn snapshot(&self) -> ContentState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ContentState> {
        self.state.subscribe()
    }

    /// Fetches catalog, recommendations and the personalized report concurrently.
    ///
    /// Each part that succeeds is installed; failures are logged and reported
    /// back but never abort the other parts.
    pub async fn load(&self) -> LoadReport {
        let (catalog, recommendations, report) = futures::join!(
            self.content.list_content(),
            self.content.recommendations(),
            self.analytics.personalized_report(),
        );

        let catalog = catalog.map(|items| {
            let count = items.len();
            self.state.send_modify(|state| state.all_content = items);
            count
        });
        let recommendations = recommendations.map(|items| {
            let count = items.len();
            self.state.send_modify(|state| state.recommended = items);
            count
        });
        let performance = report.map(|report| {
            let count = report.performance.len();
            self.state.send_modify(|state| {
                state.performance = report.performance;
                state.report = report.summary;
            });
            count
        });

        let outcome = LoadReport {
            catalog,
            recommendations,
            performance,
        };
        for (part, e) in outcome.failures() {
            warn!("Error loading {}: {}", part, e);
        }
        if outcome.is_complete() {
            info!("Content loaded");
        }
        outcome
    }

    /// Looks the id up in the loaded catalog. Never goes to the network.
    pub fn get_content_by_id(&self, id: &str) -> Option<Content> {
        self.state
            .borrow()
            .all_content
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    /// Sends the record to the backend and appends it locally once accepted.
    pub async fn record_performance(&self, record: Performance) -> PortResult<()> {
        record.validate()?;
        if let Err(e) = self
            .analytics
            .record_performance(&record.activity, &record.metrics())
            .await
        {
            error!("Error recording performance: {}", e);
            return Err(e);
        }
        debug!("Recorded performance for {}", record.activity);
        self.state.send_modify(|state| state.performance.push(record));
        Ok(())
    }

    /// Replaces the recommendations with a fresh list from the backend.
    ///
    /// The backend derives recommendations from the stored profile, so the
    /// preferences here only annotate the log.
    pub async fn update_recommendations(
        &self,
        preferred_topics: &[String],
        difficulty_level: Difficulty,
    ) -> PortResult<()> {
        debug!(
            "Refreshing recommendations for topics {:?} at {}",
            preferred_topics, difficulty_level
        );
        match self.content.recommendations().await {
            Ok(items) => {
                self.state.send_modify(|state| state.recommended = items);
                Ok(())
            }
            Err(e) => {
                error!("Error updating recommendations: {}", e);
                Err(e)
            }
        }
    }
}
