//! Query intent resolution.
//!
//! UI triggers (typing in the search box, picking a category chip, choosing a
//! source, selecting a trending tag) each update the tracked fields together
//! and hand back at most one [`Query`] to dispatch.

use super::query::{Category, Query};

/// Minimum number of characters before typing triggers a search.
pub const MIN_SEARCH_CHARS: usize = 3;

/// UI-side query state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryIntent {
    search_input: String,
    category: Category,
    source: Option<String>,
}

impl QueryIntent {
    pub fn new(category: Category) -> Self {
        Self {
            search_input: String::new(),
            category,
            source: None,
        }
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Search text that is long enough to be sent to the API.
    fn active_search(&self) -> &str {
        if self.search_input.chars().count() >= MIN_SEARCH_CHARS {
            &self.search_input
        } else {
            ""
        }
    }

    /// The query a refresh (or initial load) should run for the current state.
    pub fn current_query(&self) -> Query {
        Query::from_fields(self.source.as_deref(), self.active_search(), self.category)
    }

    /// Search box changed.
    ///
    /// Three or more characters start a search and drop the selected source.
    /// An empty box falls back to the category/source query. One or two
    /// characters are only recorded.
    pub fn on_search(&mut self, text: &str) -> Option<Query> {
        self.search_input = text.to_string();
        match text.chars().count() {
            0 => Some(self.current_query()),
            n if n >= MIN_SEARCH_CHARS => {
                self.source = None;
                Some(Query::Search(self.search_input.clone()))
            }
            _ => None,
        }
    }

    /// Category chip selected: clears search text and source.
    pub fn on_category_select(&mut self, category: Category) -> Query {
        self.category = category;
        self.search_input.clear();
        self.source = None;
        Query::Category(category)
    }

    /// Source picked. `None` means "all sources".
    ///
    /// The API cannot combine a source with a category or search term, so a
    /// concrete source clears the search text and resets the category.
    pub fn on_source_select(&mut self, source: Option<&str>) -> Query {
        self.search_input.clear();
        match source.filter(|s| !s.is_empty()) {
            Some(id) => {
                self.source = Some(id.to_string());
                self.category = Category::default();
                Query::Source(id.to_string())
            }
            None => {
                self.source = None;
                Query::Category(self.category)
            }
        }
    }

    /// Trending tag selected: a one-off search for the tag id.
    ///
    /// The tag itself is not remembered; the search box keeps whatever the
    /// user typed.
    pub fn on_tag_click(&mut self, tag_id: &str) -> Query {
        self.category = Category::default();
        self.source = None;
        Query::Search(tag_id.to_string())
    }

    /// Whether the hero article is shown above the grid.
    pub fn hero_visible(&self) -> bool {
        self.search_input.is_empty() && self.source.is_none()
    }
}
