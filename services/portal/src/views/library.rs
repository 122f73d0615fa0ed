use learning_portal_core::library::LibraryFilter;

use crate::stores::ContentState;
use crate::views::ContentCard;

/// The library screen: the active filter and the cards it lets through.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryView {
    pub filter: LibraryFilter,
    pub cards: Vec<ContentCard>,
    pub total: usize,
}

impl LibraryView {
    pub fn build(state: &ContentState, filter: &LibraryFilter) -> Self {
        Self {
            filter: filter.clone(),
            cards: filter
                .apply(&state.all_content)
                .into_iter()
                .map(ContentCard::from_content)
                .collect(),
            total: state.all_content.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
