use chrono::{TimeZone, Utc};
use learning_portal_core::catalog::sample_report;
use learning_portal_core::domain::{Difficulty, Performance};
use learning_portal_core::ports::PortError;
use std::sync::atomic::Ordering;

mod common;

use common::Harness;

fn record(activity: &str, score: f64) -> Performance {
    let mut record = Performance::new(activity, Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
    record.score = Some(score);
    record.time_spent_secs = Some(240.0);
    record.completion_rate = Some(100.0);
    record.difficulty_level = Some(Difficulty::Easy);
    record
}

#[tokio::test]
async fn test_load_installs_every_part() {
    let h = Harness::new();

    let report = h.content.load().await;

    assert!(report.is_complete());
    assert_eq!(report.catalog.unwrap(), 7);
    let state = h.content.snapshot();
    assert_eq!(state.all_content.len(), 7);
    assert_eq!(state.recommended.len(), 2);
    assert_eq!(state.performance.len(), 8);
    assert_eq!(state.report, Some(sample_report()));
}

#[tokio::test]
async fn test_load_keeps_the_parts_that_succeeded() {
    let h = Harness::new();
    h.content_backend.fail_catalog.store(true, Ordering::SeqCst);

    let report = h.content.load().await;

    assert!(!report.is_complete());
    let failures = report.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "catalog");
    assert!(matches!(failures[0].1, PortError::Transport(_)));

    let state = h.content.snapshot();
    assert!(state.all_content.is_empty());
    assert_eq!(state.recommended.len(), 2);
    assert_eq!(state.performance.len(), 8);
}

#[tokio::test]
async fn test_load_without_report_leaves_history_empty() {
    let h = Harness::new();
    h.analytics_backend.fail_report.store(true, Ordering::SeqCst);

    let report = h.content.load().await;

    assert!(report.performance.is_err());
    let state = h.content.snapshot();
    assert_eq!(state.all_content.len(), 7);
    assert!(state.performance.is_empty());
    assert!(state.report.is_none());
}

#[tokio::test]
async fn test_get_content_by_id_reads_the_loaded_catalog() {
    let h = Harness::new();
    assert!(h.content.get_content_by_id("quiz_1").is_none());

    h.content.load().await;

    let quiz = h.content.get_content_by_id("quiz_1").unwrap();
    assert_eq!(quiz.questions().len(), 2);
    assert!(h.content.get_content_by_id("nonexistent").is_none());
}

#[tokio::test]
async fn test_record_performance_appends_once_accepted() {
    let h = Harness::new();
    h.content.load().await;

    h.content.record_performance(record("article_3", 92.0)).await.unwrap();

    let state = h.content.snapshot();
    assert_eq!(state.performance.len(), 9);
    assert_eq!(state.performance.last().unwrap().activity, "article_3");

    let sent = h.analytics_backend.recorded.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "article_3");
    assert_eq!(sent[0].1.score, Some(92.0));
    assert_eq!(sent[0].1.difficulty_level, Some(Difficulty::Easy));
}

#[tokio::test]
async fn test_rejected_performance_leaves_history_unchanged() {
    let h = Harness::new();
    h.content.load().await;
    let before = h.content.snapshot().performance;
    assert_eq!(before.len(), 8);
    h.analytics_backend.reject_records.store(true, Ordering::SeqCst);

    let result = h.content.record_performance(record("article_3", 92.0)).await;

    assert!(result.is_err());
    assert_eq!(h.content.snapshot().performance, before);
}

#[tokio::test]
async fn test_out_of_range_score_never_reaches_the_backend() {
    let h = Harness::new();

    let err = h
        .content
        .record_performance(record("article_3", 150.0))
        .await
        .unwrap_err();

    assert!(matches!(err, PortError::InvalidInput(_)));
    assert!(h.analytics_backend.recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recommendations_replaces_the_list() {
    let h = Harness::new();
    h.content.load().await;
    let replacement: Vec<_> = h.content_backend.catalog.iter().skip(4).cloned().collect();
    *h.content_backend.recommended.lock().unwrap() = replacement.clone();

    h.content
        .update_recommendations(&["reading_strategies".to_string()], Difficulty::Hard)
        .await
        .unwrap();

    assert_eq!(h.content.snapshot().recommended, replacement);
}

#[tokio::test]
async fn test_failed_recommendation_refresh_keeps_the_old_list() {
    let h = Harness::new();
    h.content.load().await;
    h.content_backend
        .fail_recommendations
        .store(true, Ordering::SeqCst);

    let result = h.content.update_recommendations(&[], Difficulty::Easy).await;

    assert!(matches!(result, Err(PortError::Unauthorized)));
    assert_eq!(h.content.snapshot().recommended.len(), 2);
}
