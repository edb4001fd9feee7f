use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Top-headline categories supported by the news API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Category {
    #[default]
    General,
    Business,
    Technology,
    Entertainment,
    Health,
    Science,
    Sports,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Technology,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
    ];

    /// Wire name used in the `category` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
            Self::Science => "science",
            Self::Sports => "sports",
        }
    }

    /// Human-readable label for chips.
    pub fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Business => "Business",
            Self::Technology => "Technology",
            Self::Entertainment => "Entertainment",
            Self::Health => "Health",
            Self::Science => "Science",
            Self::Sports => "Sports",
        }
    }

    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category name that is not one of [`Category::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected one of: general, business, technology, entertainment, health, science, sports)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A resolved fetch intent. Exactly one mode is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Top headlines for a category, scoped to the configured country.
    Category(Category),
    /// Free-text search across everything, ordered by popularity.
    Search(String),
    /// Top headlines from a single source id (e.g. `bbc-news`).
    Source(String),
}

impl Query {
    /// Resolve three independently tracked fields into one query.
    ///
    /// Precedence: a source wins over a search term, and a non-empty search
    /// term wins over the category.
    pub fn from_fields(source: Option<&str>, search: &str, category: Category) -> Self {
        if let Some(source) = source.filter(|s| !s.is_empty()) {
            return Query::Source(source.to_string());
        }
        if !search.is_empty() {
            return Query::Search(search.to_string());
        }
        Query::Category(category)
    }

    /// Short label for status and log output.
    pub fn describe(&self) -> String {
        match self {
            Query::Category(c) => format!("category: {}", c.label()),
            Query::Search(term) => format!("search: {}", term),
            Query::Source(id) => format!("source: {}", id),
        }
    }

    /// The category articles from this query belong to, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Query::Category(c) => Some(*c),
            _ => None,
        }
    }
}

impl Default for Query {
    fn default() -> Self {
        Query::Category(Category::default())
    }
}
