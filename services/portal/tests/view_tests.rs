use chrono::{Duration, TimeZone, Utc};
use learning_portal_core::catalog::{sample_catalog, sample_performance, sample_report};
use learning_portal_core::domain::{AuthState, AuthStatus, ContentKind, Difficulty};
use learning_portal_core::library::LibraryFilter;
use learning_portal_core::ports::PortError;
use portal_lib::stores::ContentState;
use portal_lib::views::content_detail::VIDEO_TRANSCRIPT;
use portal_lib::views::{
    AnalyticsView, ContentDetail, Dashboard, DashboardOutcome, DetailBody, LibraryView,
    ProfileEditor,
};
use std::sync::atomic::Ordering;

mod common;

use common::{sample_user, Harness, PASSWORD, TOKEN};

fn loaded_state() -> ContentState {
    ContentState {
        all_content: sample_catalog(),
        recommended: sample_catalog().into_iter().take(3).collect(),
        performance: sample_performance(),
        report: Some(sample_report()),
    }
}

fn signed_in() -> AuthState {
    AuthState {
        user: Some(sample_user()),
        status: AuthStatus::Authenticated,
        token: Some(TOKEN.to_string()),
    }
}

//=========================================================================================
// Library
//=========================================================================================

#[test]
fn test_library_lists_everything_without_filters() {
    let view = LibraryView::build(&loaded_state(), &LibraryFilter::default());
    assert_eq!(view.cards.len(), 7);
    assert_eq!(view.total, 7);
}

#[test]
fn test_library_filters_by_kind() {
    let mut filter = LibraryFilter::default();
    filter.toggle_kind(ContentKind::Quiz);

    let view = LibraryView::build(&loaded_state(), &filter);

    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].id, "quiz_1");
    assert_eq!(view.cards[0].link, "/content/quiz_1");
}

#[test]
fn test_library_with_no_match_is_empty() {
    let mut filter = LibraryFilter::default();
    filter.set_search("astronomy");

    let view = LibraryView::build(&loaded_state(), &filter);

    assert!(view.is_empty());
}

//=========================================================================================
// Dashboard
//=========================================================================================

#[test]
fn test_dashboard_redirects_when_signed_out() {
    let outcome = Dashboard::build(&AuthState::unauthenticated(), &loaded_state());
    assert_eq!(outcome, DashboardOutcome::RedirectToLogin);
}

#[test]
fn test_dashboard_waits_while_loading() {
    let auth = AuthState {
        status: AuthStatus::Loading,
        ..AuthState::unauthenticated()
    };
    assert_eq!(Dashboard::build(&auth, &loaded_state()), DashboardOutcome::Pending);
}

#[test]
fn test_dashboard_summarises_progress() {
    let DashboardOutcome::Ready(dashboard) = Dashboard::build(&signed_in(), &loaded_state()) else {
        panic!("expected a ready dashboard");
    };

    assert_eq!(dashboard.greeting, "Welcome back, alice!");
    assert_eq!(dashboard.activities_completed, 8);
    assert_eq!(dashboard.average_score, Some(82.5));
    assert_eq!(dashboard.recommended.len(), 3);

    let next = dashboard.continue_learning.unwrap();
    assert_eq!(next.prompt, "Continue your progress with quiz 1");
    assert_eq!(next.completion_rate, 100.0);
    assert_eq!(next.minutes_spent, 7);
    assert_eq!(next.difficulty, Difficulty::Medium);
    assert_eq!(next.link, "/content/quiz_1");
}

#[test]
fn test_dashboard_without_history() {
    let state = ContentState {
        performance: Vec::new(),
        ..loaded_state()
    };
    let DashboardOutcome::Ready(dashboard) = Dashboard::build(&signed_in(), &state) else {
        panic!("expected a ready dashboard");
    };
    assert_eq!(dashboard.activities_completed, 0);
    assert_eq!(dashboard.average_score, None);
    assert!(dashboard.continue_learning.is_none());
}

//=========================================================================================
// Analytics
//=========================================================================================

#[test]
fn test_analytics_stats_and_table() {
    let view = AnalyticsView::build(&loaded_state());

    let values: Vec<f64> = view.stats.iter().map(|s| s.value).collect();
    assert_eq!(values, vec![82.5, 5.0, 98.125, 8.0]);
    assert_eq!(view.chart.labels, vec!["2025-01-12", "2025-01-15", "2025-01-20", "2025-01-28"]);
    assert_eq!(view.chart.scores, vec![85.0, 70.0, 90.0, 85.0]);

    assert_eq!(view.activities.len(), 8);
    assert_eq!(view.activities[0].activity, "article 1");
    assert_eq!(view.activities[0].score, "-");
    assert_eq!(view.activities[0].time_spent, "3 min");
    assert_eq!(view.activities[1].score, "85%");
}

#[test]
fn test_analytics_summarises_locally_without_a_report() {
    let state = ContentState {
        report: None,
        ..loaded_state()
    };
    let view = AnalyticsView::build(&state);
    assert_eq!(view.stats[0].value, 82.5);
    assert_eq!(view.chart.scores.len(), 4);
}

#[test]
fn test_analytics_orders_activities_by_timestamp() {
    let mut state = loaded_state();
    state.performance.reverse();

    let view = AnalyticsView::build(&state);

    assert_eq!(view.activities.first().unwrap().activity, "article 1");
    assert_eq!(view.activities.last().unwrap().activity, "quiz 1");
}

//=========================================================================================
// Content Detail
//=========================================================================================

#[tokio::test]
async fn test_missing_content_is_not_found() {
    let h = Harness::new();
    h.content.load().await;
    assert!(ContentDetail::open(&h.content, "nonexistent", Utc::now()).is_none());
}

#[tokio::test]
async fn test_video_detail_shows_duration_and_transcript() {
    let h = Harness::new();
    h.content.load().await;

    let detail = ContentDetail::open(&h.content, "video_1", Utc::now()).unwrap();
    let view = detail.view();

    assert_eq!(view.estimated_time, "7 min");
    match view.body {
        DetailBody::Video {
            duration,
            transcript,
            ..
        } => {
            assert_eq!(duration, "7:00");
            assert_eq!(transcript, Some(VIDEO_TRANSCRIPT));
        }
        other => panic!("expected a video body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_exercise_takes_a_spoken_answer() {
    let h = Harness::new();
    h.content.load().await;
    let mut detail = ContentDetail::open(&h.content, "exercise_1", Utc::now()).unwrap();

    assert!(detail.accepts_speech());
    assert_eq!(detail.view().estimated_time, "5-10 min");
    assert!(detail.read_aloud_text().is_none());
    detail.set_speech_answer("cat rhymes with hat");

    match detail.view().body {
        DetailBody::Exercise { answer, .. } => {
            assert_eq!(answer.as_deref(), Some("cat rhymes with hat"))
        }
        other => panic!("expected an exercise body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_quiz_submission_records_a_score() {
    let h = Harness::new();
    h.content.load().await;
    let opened = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
    let mut detail = ContentDetail::open(&h.content, "quiz_1", opened).unwrap();

    detail
        .select_answer("q1", "Difficulty with reading and writing")
        .unwrap();
    detail.select_answer("q2", "Using small fonts").unwrap();
    let result = detail
        .submit_quiz(&h.content, opened + Duration::seconds(90))
        .await
        .unwrap();

    assert_eq!((result.correct, result.total), (1, 2));
    assert_eq!(result.score, 50.0);

    let recorded = h.analytics_backend.recorded.lock().unwrap();
    let (activity, metrics) = recorded.last().unwrap();
    assert_eq!(activity, "quiz_1");
    assert_eq!(metrics.score, Some(50.0));
    assert_eq!(metrics.time_spent_secs, Some(90.0));
    assert_eq!(metrics.completion_rate, Some(100.0));
    assert_eq!(metrics.difficulty_level, Some(Difficulty::Medium));
}

#[tokio::test]
async fn test_quiz_rejects_unknown_options() {
    let h = Harness::new();
    h.content.load().await;
    let mut detail = ContentDetail::open(&h.content, "quiz_1", Utc::now()).unwrap();

    assert!(matches!(
        detail.select_answer("q1", "Not an option"),
        Err(PortError::InvalidInput(_))
    ));
    assert!(matches!(
        detail.select_answer("q9", "Using small fonts"),
        Err(PortError::InvalidInput(_))
    ));
    assert_eq!(detail.selected("q1"), None);
}

#[tokio::test]
async fn test_closing_records_time_spent() {
    let h = Harness::new();
    h.content.load().await;
    let opened = Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0).unwrap();
    let detail = ContentDetail::open(&h.content, "article_2", opened).unwrap();
    assert!(detail.read_aloud_text().is_some());

    detail
        .close(&h.content, opened + Duration::minutes(4))
        .await
        .unwrap();

    let state = h.content.snapshot();
    let last = state.performance.last().unwrap();
    assert_eq!(last.activity, "article_2");
    assert_eq!(last.time_spent_secs, Some(240.0));
    assert_eq!(last.completion_rate, Some(100.0));
    assert_eq!(last.difficulty_level, Some(Difficulty::Easy));
    assert_eq!(last.score, None);
}

//=========================================================================================
// Profile
//=========================================================================================

#[test]
fn test_profile_editor_needs_a_user() {
    assert!(ProfileEditor::from_auth(&AuthState::unauthenticated()).is_none());

    let editor = ProfileEditor::from_auth(&signed_in()).unwrap();
    assert_eq!(editor.initial(), Some('A'));
    assert!(editor.is_selected("reading_strategies"));
    assert_eq!(editor.topic_options().len(), 6);
}

#[test]
fn test_profile_topics_toggle() {
    let mut editor = ProfileEditor::from_auth(&signed_in()).unwrap();

    editor.toggle_topic("reading_strategies");
    editor.toggle_topic("assistive_technology");

    assert_eq!(editor.preferred_topics, vec!["assistive_technology"]);
}

#[tokio::test]
async fn test_profile_save_updates_then_refreshes() {
    let h = Harness::new();
    h.auth.login("alice", PASSWORD).await.unwrap();
    let mut editor = ProfileEditor::from_auth(&h.auth.snapshot()).unwrap();
    editor.toggle_topic("auditory_processing");
    editor.set_difficulty(Difficulty::Hard);

    editor.save(&h.auth, &h.content).await.unwrap();

    let updates = h.auth_backend.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].difficulty_level, Difficulty::Hard);
    assert_eq!(
        updates[0].preferred_topics,
        vec!["reading_strategies", "auditory_processing"]
    );
    assert_eq!(h.content_backend.recommendation_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        h.auth.snapshot().user.unwrap().difficulty_level,
        Difficulty::Hard
    );
}

#[tokio::test]
async fn test_failed_profile_save_skips_the_refresh() {
    let h = Harness::new();
    h.auth.login("alice", PASSWORD).await.unwrap();
    h.auth_backend.fail_updates.store(true, Ordering::SeqCst);
    let editor = ProfileEditor::from_auth(&h.auth.snapshot()).unwrap();

    assert!(editor.save(&h.auth, &h.content).await.is_err());
    assert_eq!(h.content_backend.recommendation_calls.load(Ordering::SeqCst), 0);
}
