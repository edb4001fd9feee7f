//! NewsAPI client: one request per attempt, one retry with the next key.
//!
//! Failures never reach the caller as errors. After the retry policy has
//! run, a failed fetch is an empty [`FetchOutcome`] with `error_occurred` set.

use super::credentials::CredentialRotator;
use super::endpoint::{redacted, Endpoint};
use super::error::{ConfigurationError, FetchError};
use super::models::{Article, ArticleListing, Listing, Source, SourceListing};
use crate::news::{Category, LoadingFlag, Query};
use futures::StreamExt;
use parking_lot::Mutex;
use reqwest::redirect::Policy;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use url::Url;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Default country for category headlines.
pub const DEFAULT_COUNTRY: &str = "us";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Connection settings for [`NewsClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub country: String,
    /// Per-attempt timeout.
    pub timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Result of a fetch after the fallback policy has run.
///
/// On failure `items` is empty and `error_occurred` is set; the error itself
/// has already been logged.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome<T> {
    pub items: Vec<T>,
    pub error_occurred: bool,
    /// Requests issued: 1, or 2 when the fallback key was tried.
    pub attempts: u8,
}

impl<T> FetchOutcome<T> {
    fn success(items: Vec<T>, attempts: u8) -> Self {
        Self {
            items,
            error_occurred: false,
            attempts,
        }
    }

    fn failed(attempts: u8) -> Self {
        Self {
            items: Vec::new(),
            error_occurred: true,
            attempts,
        }
    }
}

/// Limit redirects to 3 hops and reject loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        // Redirect targets may echo the query string, so never log them raw.
        tracing::debug!(
            hop = attempt.previous().len() + 1,
            to = %redacted(url),
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Reject plain-HTTP base URLs unless they point at the local machine.
fn validate_base_url(base: &str) -> Result<(), ConfigurationError> {
    let url = Url::parse(base).map_err(|e| ConfigurationError::InvalidBaseUrl(e.to_string()))?;
    match url.scheme() {
        "https" => Ok(()),
        "http" => {
            let is_localhost = matches!(url.host_str(), Some("localhost") | Some("127.0.0.1"));
            if is_localhost {
                tracing::warn!(base_url = %base, "Using non-HTTPS news API base URL (localhost only)");
                Ok(())
            } else {
                Err(ConfigurationError::InsecureBaseUrl(base.to_string()))
            }
        }
        other => Err(ConfigurationError::InvalidBaseUrl(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// HTTP client for the news API with one-shot key rotation on failure.
pub struct NewsClient {
    http: reqwest::Client,
    settings: ClientSettings,
    rotator: Mutex<CredentialRotator>,
    loading: LoadingFlag,
}

impl NewsClient {
    pub fn new(
        settings: ClientSettings,
        rotator: CredentialRotator,
    ) -> Result<Self, ConfigurationError> {
        validate_base_url(&settings.base_url)?;

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(settings.timeout)
            .build()?;

        tracing::debug!(
            base_url = %settings.base_url,
            country = %settings.country,
            timeout_secs = settings.timeout.as_secs(),
            keys = rotator.len(),
            "News client ready"
        );

        Ok(Self {
            http,
            settings,
            rotator: Mutex::new(rotator),
            loading: LoadingFlag::new(),
        })
    }

    /// Handle to the loading flag; clones observe the same state.
    pub fn loading(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Zero-based position of the key the next request will use.
    pub fn key_position(&self) -> usize {
        self.rotator.lock().position()
    }

    pub fn key_count(&self) -> usize {
        self.rotator.lock().len()
    }

    /// Fetch articles for a query.
    ///
    /// On failure the request is repeated once with the next API key (when
    /// more than one is configured). A second failure yields an empty list.
    pub async fn fetch(&self, query: &Query) -> FetchOutcome<Article> {
        let endpoint = Endpoint::for_query(query, &self.settings.country);
        self.fetch_with_fallback::<ArticleListing>(&endpoint, query.category())
            .await
    }

    /// Fetch the source listing, with the same fallback policy as [`fetch`](Self::fetch).
    pub async fn fetch_sources(&self) -> FetchOutcome<Source> {
        self.fetch_with_fallback::<SourceListing>(&Endpoint::Sources, None)
            .await
    }

    async fn fetch_with_fallback<L: Listing>(
        &self,
        endpoint: &Endpoint,
        category: Option<Category>,
    ) -> FetchOutcome<L::Item> {
        let _loading = self.loading.begin();

        let (credential, position) = {
            let rotator = self.rotator.lock();
            (copy_secret(rotator.current()), rotator.position())
        };

        let first_error = match self.attempt::<L>(endpoint, &credential, category).await {
            Ok(items) => {
                tracing::debug!(
                    endpoint = endpoint.name(),
                    count = items.len(),
                    "News request succeeded"
                );
                return FetchOutcome::success(items, 1);
            }
            Err(e) => e,
        };

        tracing::warn!(
            endpoint = endpoint.name(),
            key_position = position + 1,
            malformed = first_error.is_malformed(),
            error = %first_error,
            "News request failed"
        );

        let retry_credential = {
            let mut rotator = self.rotator.lock();
            if rotator.can_rotate() {
                Some(copy_secret(rotator.rotate()))
            } else {
                None
            }
        };

        let Some(retry_credential) = retry_credential else {
            tracing::error!(
                endpoint = endpoint.name(),
                error = %first_error,
                "No alternate API key configured, giving up"
            );
            return FetchOutcome::failed(1);
        };

        tracing::info!(endpoint = endpoint.name(), "Retrying with another API key");

        match self
            .attempt::<L>(endpoint, &retry_credential, category)
            .await
        {
            Ok(items) => {
                tracing::info!(
                    endpoint = endpoint.name(),
                    count = items.len(),
                    "Retry with fallback API key succeeded"
                );
                FetchOutcome::success(items, 2)
            }
            Err(e) => {
                tracing::error!(
                    endpoint = endpoint.name(),
                    error = %e,
                    "Retry with fallback API key failed"
                );
                FetchOutcome::failed(2)
            }
        }
    }

    /// Issue a single request with the given credential and decode it.
    pub async fn attempt<L: Listing>(
        &self,
        endpoint: &Endpoint,
        credential: &SecretString,
        category: Option<Category>,
    ) -> Result<Vec<L::Item>, FetchError> {
        let url = endpoint.url(&self.settings.base_url, credential)?;
        tracing::trace!(url = %redacted(&url), "Sending news request");

        let timeout = self.settings.timeout;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            // The API puts its error code in the body; keep it for the log.
            if let Ok(body) = read_limited_text(response, MAX_RESPONSE_SIZE, timeout).await {
                if let Err(api_err @ FetchError::Api { .. }) = L::parse(&body, category) {
                    tracing::debug!(status = status.as_u16(), error = %api_err, "API error body");
                }
            }
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_text(response, MAX_RESPONSE_SIZE, timeout).await?;
        L::parse(&body, category)
    }
}

impl std::fmt::Debug for NewsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsClient")
            .field("settings", &self.settings)
            .field("rotator", &*self.rotator.lock())
            .finish()
    }
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::from(secret.expose_secret().to_string())
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
    timeout: Duration,
) -> Result<String, FetchError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| FetchError::from_transport(e, timeout))?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| FetchError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rotator(keys: &[&str]) -> CredentialRotator {
        CredentialRotator::new(keys.iter().map(|k| SecretString::from(k.to_string()))).unwrap()
    }

    fn settings(base: &str) -> ClientSettings {
        ClientSettings {
            base_url: base.to_string(),
            ..ClientSettings::default()
        }
    }

    #[test]
    fn rejects_plain_http_base() {
        let result = NewsClient::new(settings("http://evil.example.com/v2"), rotator(&["k"]));
        assert!(matches!(result, Err(ConfigurationError::InsecureBaseUrl(_))));
    }

    #[test]
    fn accepts_localhost_http_base() {
        assert!(NewsClient::new(settings("http://127.0.0.1:9/v2"), rotator(&["k"])).is_ok());
        assert!(NewsClient::new(settings("http://localhost:9/v2"), rotator(&["k"])).is_ok());
    }

    #[test]
    fn rejects_garbage_base() {
        let result = NewsClient::new(settings("not a url"), rotator(&["k"]));
        assert!(matches!(result, Err(ConfigurationError::InvalidBaseUrl(_))));
        let result = NewsClient::new(settings("ftp://newsapi.org"), rotator(&["k"]));
        assert!(matches!(result, Err(ConfigurationError::InvalidBaseUrl(_))));
    }

    #[test]
    fn debug_output_hides_keys() {
        let client = NewsClient::new(settings(DEFAULT_BASE_URL), rotator(&["abc123secret"])).unwrap();
        let out = format!("{:?}", client);
        assert!(!out.contains("abc123secret"));
    }

    #[tokio::test]
    async fn attempt_maps_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/sources"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#,
            ))
            .mount(&server)
            .await;

        let client = NewsClient::new(
            settings(&format!("{}/v2", server.uri())),
            rotator(&["k"]),
        )
        .unwrap();
        let result = client
            .attempt::<SourceListing>(&Endpoint::Sources, &SecretString::from("k".to_string()), None)
            .await;
        assert!(matches!(result, Err(FetchError::HttpStatus(401))));
    }

    #[tokio::test]
    async fn attempt_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"ok","sources":[]}"#)
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = NewsClient::new(
            ClientSettings {
                base_url: format!("{}/v2", server.uri()),
                timeout: Duration::from_millis(100),
                ..ClientSettings::default()
            },
            rotator(&["k"]),
        )
        .unwrap();
        let result = client
            .attempt::<SourceListing>(&Endpoint::Sources, &SecretString::from("k".to_string()), None)
            .await;
        assert!(matches!(
            result,
            Err(FetchError::Timeout(d)) if d == Duration::from_millis(100)
        ));
    }

    #[tokio::test]
    async fn configured_timeout_governs_slow_responses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"status":"ok","sources":[]}"#)
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let client = NewsClient::new(
            ClientSettings {
                base_url: format!("{}/v2", server.uri()),
                timeout: Duration::from_secs(45),
                ..ClientSettings::default()
            },
            rotator(&["k"]),
        )
        .unwrap();
        let result = client
            .attempt::<SourceListing>(&Endpoint::Sources, &SecretString::from("k".to_string()), None)
            .await;
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(MAX_RESPONSE_SIZE + 1)))
            .mount(&server)
            .await;

        let client = NewsClient::new(settings(&format!("{}/v2", server.uri())), rotator(&["k"])).unwrap();
        let result = client
            .attempt::<SourceListing>(&Endpoint::Sources, &SecretString::from("k".to_string()), None)
            .await;
        assert!(matches!(result, Err(FetchError::ResponseTooLarge(_))));
    }

    #[tokio::test]
    async fn fetch_sources_uses_fallback_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/sources"))
            .and(query_param("apiKey", "first"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/sources"))
            .and(query_param("apiKey", "second"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status":"ok","sources":[{"id":"bbc-news","name":"BBC News"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = NewsClient::new(
            settings(&format!("{}/v2", server.uri())),
            rotator(&["first", "second"]),
        )
        .unwrap();
        let outcome = client.fetch_sources().await;
        assert!(!outcome.error_occurred);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(outcome.items[0].id, "bbc-news");
        assert_eq!(client.key_position(), 1);
    }
}
