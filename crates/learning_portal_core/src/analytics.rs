//! crates/learning_portal_core/src/analytics.rs
//!
//! Summarises performance records into an [`AnalyticsReport`].

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::{AnalyticsReport, Performance, ProgressPoint, Stat};

impl Stat {
    /// Mean, min and max of `values`. No values gives an all-zero stat.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return Stat::default();
        }
        Stat {
            mean: sum / count as f64,
            min,
            max,
        }
    }
}

impl AnalyticsReport {
    /// Builds the report for a set of records, or `None` when there are none.
    ///
    /// The progress series holds one point per calendar day (UTC) with scored
    /// records, carrying that day's mean score, in date order.
    pub fn summarize(records: &[Performance]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        let mut by_day: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for record in records {
            if let Some(score) = record.score {
                let entry = by_day.entry(record.timestamp.date_naive()).or_insert((0.0, 0));
                entry.0 += score;
                entry.1 += 1;
            }
        }

        Some(Self {
            scores: Stat::from_values(records.iter().filter_map(|r| r.score)),
            time_spent: Stat::from_values(records.iter().filter_map(|r| r.time_spent_secs)),
            completion_rate: Stat::from_values(records.iter().filter_map(|r| r.completion_rate)),
            progress_over_time: by_day
                .into_iter()
                .map(|(date, (total, count))| ProgressPoint {
                    date,
                    score: total / count as f64,
                })
                .collect(),
        })
    }
}

/// Mean score of the records that carry one.
pub fn average_score(records: &[Performance]) -> Option<f64> {
    let scored: Vec<f64> = records.iter().filter_map(|r| r.score).collect();
    if scored.is_empty() {
        None
    } else {
        Some(scored.iter().sum::<f64>() / scored.len() as f64)
    }
}
