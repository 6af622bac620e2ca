//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for one site's pipeline, including:
//! - Building HTTP clients with the operator's user agent string
//! - GET requests for listing pages and coach documents
//! - The rate-limit gate shared by every request-bearing operation
//! - Error classification
//!
//! Nothing here retries. A failed request is reported once and the caller
//! moves on.

use crate::config::UserAgentConfig;
use reqwest::{Client, StatusCode};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered 200 OK
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// The server answered with anything other than 200 OK
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, unreadable body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body if and only if the fetch succeeded
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Status code for logging; network errors have none
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } | Self::HttpError { status_code } => {
                Some(*status_code)
            }
            Self::NetworkError { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use coach_scraper::config::UserAgentConfig;
/// use coach_scraper::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     contact: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once, classifying the outcome
///
/// Only a 200 response carries a body; every other status is an
/// [`FetchResult::HttpError`] even if the server sent content.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                }
            }
        }
    }
}

/// Rate-limited fetcher owned by one site's pipeline
///
/// The "has made a request" flag lives on the instance, so two sites running
/// side by side never wait on each other.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
    has_made_request: AtomicBool,
    request_count: AtomicU64,
}

impl Fetcher {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self {
            client,
            delay,
            has_made_request: AtomicBool::new(false),
            request_count: AtomicU64::new(0),
        }
    }

    /// Issues exactly one GET
    ///
    /// Marks the fetcher as having made a request whatever the outcome.
    /// Never sleeps; see [`Fetcher::rate_limit_gate`].
    pub async fn fetch(&self, url: &str) -> FetchResult {
        self.has_made_request.store(true, Ordering::SeqCst);
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let result = fetch_url(&self.client, url).await;
        match &result {
            FetchResult::Success { body, .. } => {
                tracing::trace!("GET {} -> 200 ({} bytes)", url, body.len())
            }
            FetchResult::HttpError { status_code } => {
                tracing::debug!("GET {} -> {}", url, status_code)
            }
            FetchResult::NetworkError { error } => tracing::debug!("GET {} failed: {}", url, error),
        }
        result
    }

    /// Waits out the configured delay, unless nothing has been requested yet
    ///
    /// Call once before each request-bearing operation.
    pub async fn rate_limit_gate(&self) {
        if self.has_made_request.load(Ordering::SeqCst) && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    pub fn has_made_request(&self) -> bool {
        self.has_made_request.load(Ordering::SeqCst)
    }

    /// Number of GETs issued over the fetcher's lifetime
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }
}
