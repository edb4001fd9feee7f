use std::time::Duration;
use thiserror::Error;

/// Errors raised while assembling the client. These are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// No API keys were configured (config file and environment both empty).
    #[error("No API keys configured: set NEWS_API_KEYS or api_keys in config.toml")]
    NoCredentials,
    /// The base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    /// The base URL is plain HTTP and not a loopback host.
    #[error("Insecure base URL: HTTPS required (except localhost for testing): {0}")]
    InsecureBaseUrl(String),
    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Errors that can occur during a single request attempt.
///
/// Every variant is recovered the same way by the client: one retry with the
/// next credential, then a soft failure. The split exists for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Request exceeded the per-attempt timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The API answered with `"status": "error"`
    #[error("API error ({code}): {message}")]
    Api { code: String, message: String },
    /// Payload did not have the expected shape
    #[error("Malformed response: {0}")]
    Malformed(String),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Response body was not valid UTF-8
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    /// Endpoint URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl FetchError {
    /// Classify a reqwest failure, keeping timeouts distinct from other
    /// transport errors.
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Network(err)
        }
    }

    /// True for payload-shape problems, false for transport and status failures.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FetchError::Malformed(_) | FetchError::InvalidUtf8)
    }
}
