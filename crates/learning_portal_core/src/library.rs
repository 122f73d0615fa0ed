//! crates/learning_portal_core/src/library.rs
//!
//! The content library filter: topic, type and difficulty facets plus a free
//! text search, mirrored to URL query parameters.

use crate::domain::{Content, ContentKind, Difficulty};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryFilter {
    pub topic: Option<String>,
    pub kind: Option<ContentKind>,
    pub difficulty: Option<Difficulty>,
    pub search: String,
}

impl LibraryFilter {
    /// Builds a filter from query parameters. Unknown keys and unparsable values are ignored.
    pub fn from_query_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filter = Self::default();
        for (key, value) in params {
            if value.is_empty() {
                continue;
            }
            match key {
                "topic" => filter.topic = Some(value.to_string()),
                "type" => filter.kind = value.parse().ok(),
                "difficulty" => filter.difficulty = value.parse().ok(),
                "search" => filter.search = value.to_string(),
                _ => {}
            }
        }
        filter
    }

    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(topic) = &self.topic {
            params.push(("topic", topic.clone()));
        }
        if let Some(kind) = self.kind {
            params.push(("type", kind.as_str().to_string()));
        }
        if let Some(level) = self.difficulty {
            params.push(("difficulty", level.as_str().to_string()));
        }
        if !self.search.is_empty() {
            params.push(("search", self.search.clone()));
        }
        params
    }

    // Selecting the active value again clears the facet.

    pub fn toggle_topic(&mut self, topic: &str) {
        if self.topic.as_deref() == Some(topic) {
            self.topic = None;
        } else {
            self.topic = Some(topic.to_string());
        }
    }

    pub fn toggle_kind(&mut self, kind: ContentKind) {
        self.kind = if self.kind == Some(kind) { None } else { Some(kind) };
    }

    pub fn toggle_difficulty(&mut self, level: Difficulty) {
        self.difficulty = if self.difficulty == Some(level) {
            None
        } else {
            Some(level)
        };
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, item: &Content) -> bool {
        if let Some(topic) = &self.topic {
            if &item.topic != topic {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if item.kind() != kind {
                return false;
            }
        }
        if let Some(level) = self.difficulty {
            if item.difficulty != level {
                return false;
            }
        }
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            return item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle);
        }
        true
    }

    pub fn apply<'a>(&self, catalog: &'a [Content]) -> Vec<&'a Content> {
        catalog.iter().filter(|item| self.matches(item)).collect()
    }
}
