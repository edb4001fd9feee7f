//! Request URLs for the news API.
//!
//! The credential is only attached when a URL is built, and [`redacted`]
//! masks it again for logging.

use super::error::FetchError;
use crate::news::{Category, Query};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Query parameter carrying the API key.
const API_KEY_PARAM: &str = "apiKey";

/// One of the API's GET endpoints, independent of the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `/top-headlines?sources=..`
    HeadlinesBySource { source: String },
    /// `/everything?q=..&sortBy=popularity`
    Search { term: String },
    /// `/top-headlines?country=..&category=..`
    HeadlinesByCategory { country: String, category: Category },
    /// `/sources`
    Sources,
}

impl Endpoint {
    /// Select the endpoint shape for a query.
    pub fn for_query(query: &Query, country: &str) -> Self {
        match query {
            Query::Source(source) => Endpoint::HeadlinesBySource {
                source: source.clone(),
            },
            Query::Search(term) => Endpoint::Search { term: term.clone() },
            Query::Category(category) => Endpoint::HeadlinesByCategory {
                country: country.to_string(),
                category: *category,
            },
        }
    }

    fn path(&self) -> &'static str {
        match self {
            Endpoint::HeadlinesBySource { .. } | Endpoint::HeadlinesByCategory { .. } => {
                "top-headlines"
            }
            Endpoint::Search { .. } => "everything",
            Endpoint::Sources => "sources",
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::HeadlinesBySource { .. } => "headlines-by-source",
            Endpoint::Search { .. } => "search",
            Endpoint::HeadlinesByCategory { .. } => "headlines-by-category",
            Endpoint::Sources => "sources",
        }
    }

    /// Build the full request URL, credential included.
    pub fn url(&self, base: &str, credential: &SecretString) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), self.path()))?;
        {
            let mut pairs = url.query_pairs_mut();
            match self {
                Endpoint::HeadlinesBySource { source } => {
                    pairs.append_pair("sources", source);
                }
                Endpoint::Search { term } => {
                    pairs.append_pair("q", term);
                    pairs.append_pair("sortBy", "popularity");
                }
                Endpoint::HeadlinesByCategory { country, category } => {
                    pairs.append_pair("country", country);
                    pairs.append_pair("category", category.as_str());
                }
                Endpoint::Sources => {}
            }
            pairs.append_pair(API_KEY_PARAM, credential.expose_secret());
        }
        Ok(url)
    }
}

/// Render a request URL for logging with the API key masked.
pub fn redacted(url: &Url) -> String {
    let mut masked = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == API_KEY_PARAM {
                (k.into_owned(), "[REDACTED]".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    masked.query_pairs_mut().clear().extend_pairs(pairs);
    masked.to_string()
}
