//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made by a worker:
//! - Building the HTTP client with the worker user agent and timeouts
//! - GET requests for listing and detail pages
//! - Mapping transport failures and non-success statuses to errors

use crate::HarvestError;
use reqwest::Client;
use scraper::Html;
use std::borrow::Cow;
use std::time::Duration;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("hostcrawl/", env!("CARGO_PKG_VERSION"));

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A fetched page
#[derive(Debug, Clone)]
pub struct Page {
    /// Final URL after redirects
    pub url: String,

    /// HTTP status code
    pub status_code: u16,

    /// Raw response body
    pub body: Vec<u8>,
}

impl Page {
    /// Creates a page from parts, mostly useful for extractor tests
    pub fn new(url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status_code: 200,
            body: body.into(),
        }
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Body parsed as an HTML document
    pub fn document(&self) -> Html {
        Html::parse_document(&self.text())
    }
}

/// Builds an HTTP client with proper configuration
///
/// `timeout` bounds each request as a whole; a hung server therefore costs
/// at most one timeout before the crawl moves on.
///
/// # Example
///
/// ```no_run
/// use hostcrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the page on a 2xx response
///
/// # Returns
///
/// * `Ok(Page)` - Successfully fetched page
/// * `Err(HarvestError::Status)` - Server answered with a non-success status
/// * `Err(HarvestError::Http)` - Transport failure (connect, timeout, body read)
pub async fn fetch_page(client: &Client, url: &str) -> Result<Page, HarvestError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response
        .bytes()
        .await
        .map_err(|source| HarvestError::Http {
            url: url.to_string(),
            source,
        })?;

    Ok(Page {
        url: final_url,
        status_code: status.as_u16(),
        body: body.to_vec(),
    })
}
