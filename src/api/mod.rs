//! NewsAPI client.
//!
//! - `credentials` - ordered API key set with modular rotation
//! - `endpoint` - maps a query onto a request URL
//! - `models` - articles, sources and response decoding
//! - `client` - HTTP client with a single rotated-key retry
//!
//! ```no_run
//! use newsdeck::api::{ClientSettings, CredentialRotator, NewsClient};
//! use newsdeck::news::{Category, Query};
//! use secrecy::SecretString;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let keys = vec![SecretString::from("primary".to_string()), SecretString::from("backup".to_string())];
//! let client = NewsClient::new(ClientSettings::default(), CredentialRotator::new(keys)?)?;
//! let outcome = client.fetch(&Query::Category(Category::Technology)).await;
//! println!("{} articles", outcome.items.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod credentials;
mod endpoint;
mod error;
mod models;

pub use client::{ClientSettings, FetchOutcome, NewsClient, DEFAULT_BASE_URL, DEFAULT_COUNTRY};
pub use credentials::CredentialRotator;
pub use endpoint::{redacted, Endpoint};
pub use error::{ConfigurationError, FetchError};
pub use models::{Article, ArticleListing, Listing, Source, SourceListing};
