//! crates/learning_portal_core/src/recommend.rs
//!
//! The recommendation filter: a bounded, order-preserving selection from the
//! catalog for a learner's topic and difficulty preferences.

use crate::domain::{Content, Difficulty};

/// The most items a recommendation list ever holds.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Keeps the items whose topic is in `topics`. An empty topic set keeps everything.
pub fn filter_by_topics<'a, S: AsRef<str>>(catalog: &'a [Content], topics: &[S]) -> Vec<&'a Content> {
    catalog
        .iter()
        .filter(|item| topics.is_empty() || topics.iter().any(|t| t.as_ref() == item.topic))
        .collect()
}

/// Selects up to [`MAX_RECOMMENDATIONS`] items for the given preferences.
///
/// When the filters leave nothing, the first items of the unfiltered catalog
/// are returned so a learner never sees an empty list.
pub fn recommend<'a, S: AsRef<str>>(
    catalog: &'a [Content],
    topics: &[S],
    difficulty: Option<Difficulty>,
) -> Vec<&'a Content> {
    let matching: Vec<&Content> = filter_by_topics(catalog, topics)
        .into_iter()
        .filter(|item| difficulty.map_or(true, |level| item.difficulty == level))
        .collect();

    if matching.is_empty() {
        return catalog.iter().take(MAX_RECOMMENDATIONS).collect();
    }

    matching.into_iter().take(MAX_RECOMMENDATIONS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;

    fn ids(items: &[&Content]) -> Vec<String> {
        items.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn topic_filter_keeps_only_requested_topics() {
        let catalog = sample_catalog();
        let kept = filter_by_topics(&catalog, &["phonological_awareness"]);
        assert_eq!(ids(&kept), vec!["exercise_1", "exercise_2"]);
        assert!(kept.iter().all(|c| c.topic == "phonological_awareness"));
    }

    #[test]
    fn empty_topic_set_keeps_whole_catalog() {
        let catalog = sample_catalog();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_topics(&catalog, &none).len(), catalog.len());
    }

    #[test]
    fn falls_back_to_first_three_catalog_items() {
        let catalog = sample_catalog();
        let picked = recommend(&catalog, &["unknown_topic"], Some(Difficulty::Hard));
        assert_eq!(ids(&picked), vec!["article_1", "article_2", "exercise_1"]);
    }

    #[test]
    fn difficulty_only_filter_truncates_to_three() {
        let catalog = sample_catalog();
        let none: [&str; 0] = [];
        let picked = recommend(&catalog, &none, Some(Difficulty::Medium));
        assert_eq!(ids(&picked), vec!["article_1", "video_1", "quiz_1"]);
    }

    #[test]
    fn topics_and_difficulty_combine() {
        let catalog = sample_catalog();
        let picked = recommend(
            &catalog,
            &["reading_strategies", "assistive_technology"],
            Some(Difficulty::Medium),
        );
        assert_eq!(ids(&picked), vec!["article_3"]);
    }

    #[test]
    fn never_returns_more_than_the_limit() {
        let catalog = sample_catalog();
        for level in [None, Some(Difficulty::Easy), Some(Difficulty::Medium), Some(Difficulty::Hard)] {
            let none: [&str; 0] = [];
            assert!(recommend(&catalog, &none, level).len() <= MAX_RECOMMENDATIONS);
        }
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let picked = recommend(&[], &["reading_strategies"], None);
        assert!(picked.is_empty());
    }
}
