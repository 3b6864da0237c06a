//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for both stages:
//! - Building the HTTP client with the identifying user agent and timeout
//! - Keeping redirects inside the crawl domain
//! - Single-attempt GET requests
//! - Error classification
//!
//! Failures are returned as `FetchError` values and never retried; callers
//! log them and move on to the next URL.

use crate::config::UserAgentConfig;
use crate::url::is_within_domain;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched document
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Response body, decoded as text
    pub body: String,
}

/// Why a fetch produced no content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request failed for {url}: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        let url = url.to_string();
        if error.is_timeout() {
            Self::Timeout { url }
        } else if error.is_connect() {
            Self::Connect {
                url,
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            Self::Status {
                url,
                status: status.as_u16(),
            }
        } else {
            Self::Transport {
                url,
                message: error.to_string(),
            }
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to a fixed limit. When `domain` is given, a
/// redirect whose target is outside it is not followed and the redirect
/// response itself is returned.
///
/// # Example
///
/// ```no_run
/// use hdl_harvest::config::UserAgentConfig;
/// use hdl_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(
///     &UserAgentConfig::default(),
///     Duration::from_secs(10),
///     Some("asic-world.com"),
/// )
/// .unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
    domain: Option<&str>,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(redirect_policy(domain.map(str::to_string)))
        .gzip(true)
        .brotli(true)
        .build()
}

fn redirect_policy(domain: Option<String>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if domain
            .as_deref()
            .is_some_and(|domain| !is_within_domain(attempt.url(), domain))
        {
            tracing::debug!("Not following redirect off the crawl domain to {}", attempt.url());
            attempt.stop()
        } else {
            attempt.follow()
        }
    })
}

/// Fetches a URL with a single GET
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedDocument)` |
/// | Other status (including an unfollowed redirect) | `FetchError::Status` |
/// | Timeout (connect, headers or body) | `FetchError::Timeout` |
/// | Connection refused / DNS / TLS | `FetchError::Connect` |
/// | Anything else | `FetchError::Transport` |
pub async fn fetch(client: &Client, url: &Url) -> Result<FetchedDocument, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().clone();
    let body = response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    Ok(FetchedDocument {
        url: final_url,
        status: status.as_u16(),
        body,
    })
}
