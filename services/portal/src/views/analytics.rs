//! services/portal/src/views/analytics.rs
//!
//! The learning analytics screen: key stats, the progress series handed to
//! the chart, and the activity table.

use chrono::NaiveDate;
use learning_portal_core::domain::AnalyticsReport;

use crate::stores::ContentState;
use crate::views::{activity_label, minutes};

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub activity: String,
    pub date: NaiveDate,
    pub score: String,
    pub time_spent: String,
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsView {
    pub stats: Vec<StatCard>,
    pub chart: ChartSeries,
    pub activities: Vec<ActivityRow>,
}

impl AnalyticsView {
    /// Prefers the backend's summary and falls back to summarising the local history.
    pub fn build(state: &ContentState) -> Self {
        let report = state
            .report
            .clone()
            .or_else(|| AnalyticsReport::summarize(&state.performance));

        let (score, time, completion, chart) = match &report {
            Some(r) => (
                r.scores.mean,
                minutes(r.time_spent.mean) as f64,
                r.completion_rate.mean,
                ChartSeries {
                    labels: r
                        .progress_over_time
                        .iter()
                        .map(|p| p.date.to_string())
                        .collect(),
                    scores: r.progress_over_time.iter().map(|p| p.score).collect(),
                },
            ),
            None => (0.0, 0.0, 0.0, ChartSeries::default()),
        };

        let stats = vec![
            StatCard {
                title: "Average Score",
                value: score,
                unit: "%",
            },
            StatCard {
                title: "Time Spent",
                value: time,
                unit: " min",
            },
            StatCard {
                title: "Completion Rate",
                value: completion,
                unit: "%",
            },
            StatCard {
                title: "Activities Completed",
                value: state.performance.len() as f64,
                unit: "",
            },
        ];

        let mut history: Vec<_> = state.performance.iter().collect();
        history.sort_by_key(|p| p.timestamp);
        let activities = history
            .into_iter()
            .map(|p| ActivityRow {
                activity: activity_label(&p.activity),
                date: p.timestamp.date_naive(),
                score: p
                    .score
                    .map(|s| format!("{}%", s))
                    .unwrap_or_else(|| "-".to_string()),
                time_spent: p
                    .time_spent_secs
                    .map(|t| format!("{} min", minutes(t)))
                    .unwrap_or_else(|| "-".to_string()),
                completion_rate: p.completion_rate.unwrap_or(0.0),
            })
            .collect();

        Self {
            stats,
            chart,
            activities,
        }
    }
}
