//! Wire formats of the news API and the article/source types built from them.
//!
//! Parsing is strict about the envelope: an error status becomes
//! [`FetchError::Api`] and a missing list or required field is `Malformed`.

use super::error::FetchError;
use crate::news::Category;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Title the API substitutes for articles that were taken down.
const REMOVED_PLACEHOLDER: &str = "[Removed]";

/// A news article as shown in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub article_url: String,
    pub source_name: String,
    pub source_id: Option<String>,
    pub published_at: DateTime<Utc>,
    pub content: Option<String>,
    pub author: Option<String>,
    /// Set when the article came from a category query.
    pub category: Option<Category>,
}

/// A publisher from the source listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Source {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawSourceRef {
    #[serde(default)]
    id: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    source: RawSourceRef,
    #[serde(default)]
    author: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    url: String,
    #[serde(default)]
    url_to_image: Option<String>,
    published_at: DateTime<Utc>,
    #[serde(default)]
    content: Option<String>,
}

impl RawArticle {
    fn into_article(self, category: Option<Category>) -> Article {
        Article {
            title: self.title,
            description: non_blank(self.description),
            image_url: non_blank(self.url_to_image),
            article_url: self.url,
            source_name: self.source.name,
            source_id: non_blank(self.source.id),
            published_at: self.published_at,
            content: non_blank(self.content),
            author: non_blank(self.author),
            category,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Fields common to every response envelope.
#[derive(Debug, Deserialize)]
struct Status {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Status {
    fn check(self) -> Result<(), FetchError> {
        match self.status.as_str() {
            "ok" => Ok(()),
            "error" => Err(FetchError::Api {
                code: self.code.unwrap_or_else(|| "unknown".to_string()),
                message: self.message.unwrap_or_default(),
            }),
            other => Err(FetchError::Malformed(format!("unexpected status '{}'", other))),
        }
    }
}

/// A response body that yields a list of items.
pub trait Listing: Sized {
    type Item;

    /// Decode the body, checking the envelope status and required fields.
    fn parse(body: &str, category: Option<Category>) -> Result<Vec<Self::Item>, FetchError>;
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))
}

/// `/top-headlines` and `/everything` responses.
pub struct ArticleListing;

#[derive(Debug, Deserialize)]
struct ArticleEnvelope {
    articles: Option<Vec<RawArticle>>,
}

impl Listing for ArticleListing {
    type Item = Article;

    fn parse(body: &str, category: Option<Category>) -> Result<Vec<Article>, FetchError> {
        decode::<Status>(body)?.check()?;
        let envelope: ArticleEnvelope = decode(body)?;
        let raw = envelope
            .articles
            .ok_or_else(|| FetchError::Malformed("missing 'articles' array".to_string()))?;

        let total = raw.len();
        let articles: Vec<Article> = raw
            .into_iter()
            .filter(|a| a.title.trim() != REMOVED_PLACEHOLDER)
            .map(|a| a.into_article(category))
            .collect();

        if articles.len() < total {
            tracing::debug!(
                removed = total - articles.len(),
                "Dropped removed-article placeholders"
            );
        }
        Ok(articles)
    }
}

/// `/sources` responses.
pub struct SourceListing;

#[derive(Debug, Deserialize)]
struct SourceEnvelope {
    sources: Option<Vec<Source>>,
}

impl Listing for SourceListing {
    type Item = Source;

    fn parse(body: &str, _category: Option<Category>) -> Result<Vec<Source>, FetchError> {
        decode::<Status>(body)?.check()?;
        let envelope: SourceEnvelope = decode(body)?;
        envelope
            .sources
            .ok_or_else(|| FetchError::Malformed("missing 'sources' array".to_string()))
    }
}
