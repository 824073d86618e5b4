//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests returning the raw page body
//! - Error classification (network failure vs non-success status)
//!
//! There is no retry: any failure here is returned to the coordinator,
//! which aborts the crawl.

use crate::config::Config;
use crate::CrawlError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for a single page
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, if any
    pub content_type: Option<String>,
    /// Raw response body, exactly as received
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `CrawlerName/Version`.
///
/// # Example
///
/// ```no_run
/// use wbdl::config::Config;
/// use wbdl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(config.crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.crawler.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// # Errors
///
/// * `CrawlError::Fetch` - connection failure, timeout, too many redirects,
///   or the body could not be read
/// * `CrawlError::Status` - the server answered with a non-2xx status
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, CrawlError> {
    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body: body.to_vec(),
    })
}
