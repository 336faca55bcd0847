//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the fixed header set
//! - Single-attempt GET requests with a redirect cap
//! - Error classification (status, timeout, redirect limit, transport)

use crate::config::CrawlConfig;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{redirect::Policy, Client};
use thiserror::Error;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// A successfully fetched resource
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// HTTP status code, always 2xx
    pub status: u16,

    /// Response body, untouched
    pub body: Vec<u8>,

    /// Content-Type header value (empty if absent)
    pub content_type: String,
}

impl FetchResult {
    /// Returns true if the content type indicates an HTML document
    pub fn is_html(&self) -> bool {
        self.content_type.contains("text/html")
    }

    /// Returns true if the content type indicates a stylesheet
    pub fn is_css(&self) -> bool {
        self.content_type.contains("text/css")
    }
}

/// Ways a single fetch can fail
///
/// None of these are retried; the caller decides what a failure means.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status
    #[error("HTTP status {status}")]
    Status { status: u16 },

    /// The redirect chain exceeded [`MAX_REDIRECTS`] hops
    #[error("too many redirects")]
    TooManyRedirects,

    /// The request did not complete within the per-request timeout
    #[error("request timed out")]
    Timeout,

    /// DNS, connection or body read failure
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else {
            FetchError::Transport(error)
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Every request carries the configured user agent plus fixed `Accept` and
/// `Accept-Language` headers, is bounded by the per-request timeout, and
/// follows at most [`MAX_REDIRECTS`] redirects.
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::CrawlConfig;
/// use site_mirror::crawler::build_http_client;
///
/// let config = CrawlConfig::new("https://example.com/").unwrap();
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &CrawlConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(ACCEPT_LANGUAGE),
    );

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.request_timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// # Returns
///
/// * `Ok(FetchResult)` - 2xx response with its body and content type
/// * `Err(FetchError)` - Non-2xx status, timeout, redirect cap or transport failure
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchResult, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body = response.bytes().await?.to_vec();

    Ok(FetchResult {
        status: status.as_u16(),
        body,
        content_type,
    })
}
