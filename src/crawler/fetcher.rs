//! HTTP fetcher implementation
//!
//! This module handles page fetching for the crawler, including:
//! - Building the long-lived HTTP client
//! - GET requests with bounded retry on transient failure
//! - The round-robin proxy pool handing out one proxy URL per request

use crate::{Result, ScrapeError};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Attempts per page fetch; failures in between are transient by definition.
const FETCH_ATTEMPTS: u32 = 3;

/// Delay between fetch attempts.
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// Builds the long-lived HTTP client used for page fetches.
pub fn build_http_client(user_agent: &str) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body with retry on transient failure.
///
/// Retries network errors and non-success statuses up to [`FETCH_ATTEMPTS`]
/// times with a short delay. The last error is returned if all attempts fail;
/// callers treat that as a failed page task, not a fatal error.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let mut last_error = None;

    for attempt in 1..=FETCH_ATTEMPTS {
        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return response
                        .text()
                        .await
                        .map_err(|source| ScrapeError::Http {
                            url: url.to_string(),
                            source,
                        });
                }

                tracing::debug!(
                    "GET {} returned HTTP {} (attempt {}/{})",
                    url,
                    status,
                    attempt,
                    FETCH_ATTEMPTS
                );
                last_error = Some(ScrapeError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Err(source) => {
                tracing::debug!(
                    "GET {} failed: {} (attempt {}/{})",
                    url,
                    source,
                    attempt,
                    FETCH_ATTEMPTS
                );
                last_error = Some(ScrapeError::Http {
                    url: url.to_string(),
                    source,
                });
            }
        }

        if attempt < FETCH_ATTEMPTS {
            tokio::time::sleep(RETRY_DELAY).await;
        }
    }

    Err(last_error.unwrap_or(ScrapeError::Timeout {
        url: url.to_string(),
    }))
}

/// Round-robin pool of proxy URLs.
///
/// Assignment is per-request: each call to [`ProxyPool::next_url`] hands out
/// the next entry. Entries are opaque strings; malformed ones fail at client
/// construction time and the request proceeds without a proxy.
pub struct ProxyPool {
    urls: Vec<String>,
    cursor: AtomicUsize,
}

impl ProxyPool {
    /// Creates a pool from the configured proxy URLs; `None` when empty.
    pub fn from_urls(urls: &[String]) -> Option<Self> {
        if urls.is_empty() {
            return None;
        }
        Some(Self {
            urls: urls.to_vec(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Returns the next proxy URL in round-robin order.
    pub fn next_url(&self) -> &str {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.urls.len();
        &self.urls[index]
    }
}

/// Builds a one-off client routed through the given proxy.
///
/// Returns `None` if the proxy URL is malformed or the client cannot be
/// built; callers fall back to an unproxied request.
pub fn proxied_client(user_agent: &str, proxy_url: &str) -> Option<Client> {
    let proxy = match reqwest::Proxy::all(proxy_url) {
        Ok(proxy) => proxy,
        Err(e) => {
            tracing::debug!("Ignoring malformed proxy URL {}: {}", proxy_url, e);
            return None;
        }
    };

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .proxy(proxy)
        .build()
        .ok()
}
