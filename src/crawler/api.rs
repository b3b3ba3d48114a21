//! Structured fetch via the site's JSON endpoint
//!
//! The quote listing pages answer with JSON when asked with `format=json`
//! and an XMLHttpRequest identification header. This module derives the
//! endpoint from the page URL's shape, fetches it, and maps the payload into
//! quote records. Every failure — no matching URL shape, network error,
//! malformed body, missing `quotes` array — degrades to "unavailable"
//! (`None`), and the caller falls back to markup extraction.

use crate::crawler::fetcher::{proxied_client, ProxyPool};
use crate::record::QuoteRecord;
use crate::urls::to_absolute;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use url::Url;

/// Retries after the initial structured request.
const API_RETRIES: u32 = 2;

/// Total timeout per structured request.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Payload shape of the structured endpoint; the `quotes` array is mandatory.
#[derive(Debug, Deserialize)]
struct QuotesPayload {
    quotes: Vec<ApiQuote>,
}

/// One quote element as the endpoint serves it.
///
/// The endpoint has used two field-name spellings per attribute over time;
/// both are resolved here by serde renames/aliases rather than runtime
/// probing. Likes arrive as a number or a numeric string.
#[derive(Debug, Deserialize)]
pub struct ApiQuote {
    #[serde(rename = "quoteText", alias = "text", default)]
    quote_text: String,

    #[serde(rename = "authorName", alias = "author", default)]
    author_name: String,

    #[serde(default, deserialize_with = "lenient_tags")]
    tags: Vec<String>,

    #[serde(
        rename = "likesCount",
        alias = "likes",
        default,
        deserialize_with = "lenient_count"
    )]
    likes: u32,

    #[serde(rename = "bookTitle", default)]
    book_title: Option<String>,

    #[serde(rename = "quoteUrl", default)]
    quote_url: Option<String>,

    #[serde(default)]
    url: Option<String>,
}

impl ApiQuote {
    /// Maps an endpoint element into a record, applying the shared
    /// normalization and length gate. `base` resolves relative quote URLs.
    fn into_record(self, base: &Url) -> Option<QuoteRecord> {
        let url = match self.quote_url {
            Some(absolute) if !absolute.trim().is_empty() => Url::parse(absolute.trim()).ok(),
            _ => self.url.as_deref().and_then(|href| to_absolute(href, base)),
        };

        QuoteRecord::build(
            &self.quote_text,
            &self.author_name,
            self.tags,
            self.likes,
            self.book_title,
            url,
        )
    }
}

/// Accepts a likes value serialized as a number, a numeric string, or null.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0).min(u32::MAX as u64) as u32,
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// Accepts tags only when serialized as an array of strings.
fn lenient_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Derives the structured endpoint for a page URL, if its shape supports one.
///
/// Three mutually exclusive shape rules, in priority order:
/// 1. tag listing (`/quotes/tag/<tag>`) → tag endpoint
/// 2. search listing (`/quotes/search?q=…`) → search endpoint
/// 3. bare listing (`/quotes`) → listing endpoint
///
/// The endpoint keeps the page URL's origin, so the same derivation works
/// against the production site and a test server.
pub fn derive_endpoint(url: &Url, page_no: u32) -> Option<Url> {
    let origin = url.origin().ascii_serialization();
    let path = url.path();

    if let Some(tag) = tag_segment(url) {
        let endpoint = format!(
            "{}/quotes/tag/{}?format=json&page={}",
            origin, tag, page_no
        );
        return Url::parse(&endpoint).ok();
    }

    if path.contains("/quotes/search") {
        let query = url
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())?;
        let mut endpoint = Url::parse(&format!("{}/quotes/search?format=json", origin)).ok()?;
        endpoint
            .query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("page", &page_no.to_string());
        return Some(endpoint);
    }

    if path.starts_with("/quotes") {
        let endpoint = format!("{}/quotes?format=json&page={}", origin, page_no);
        return Url::parse(&endpoint).ok();
    }

    None
}

/// Extracts the raw (still percent-encoded) tag segment from a tag-listing
/// path.
fn tag_segment(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "quotes" {
            if let Some("tag") = segments.next() {
                return segments.next().filter(|s| !s.is_empty()).map(String::from);
            }
            return None;
        }
    }
    None
}

/// Attempts the structured fetch for a page.
///
/// Returns the mapped records on success, or `None` when the endpoint does
/// not apply or anything goes wrong — never an error. When a proxy pool is
/// configured, a fresh proxy URL is used for this single request; a malformed
/// proxy entry falls back to the unproxied client.
pub async fn fetch_structured(
    client: &Client,
    proxies: Option<&ProxyPool>,
    user_agent: &str,
    url: &Url,
    page_no: u32,
) -> Option<Vec<QuoteRecord>> {
    let endpoint = derive_endpoint(url, page_no)?;

    let proxied = proxies.and_then(|pool| proxied_client(user_agent, pool.next_url()));
    let client = proxied.as_ref().unwrap_or(client);

    for attempt in 0..=API_RETRIES {
        let request = client
            .get(endpoint.clone())
            .header("accept", "application/json, text/javascript, */*; q=0.01")
            .header("x-requested-with", "XMLHttpRequest")
            .timeout(API_TIMEOUT);

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                return match response.json::<QuotesPayload>().await {
                    Ok(payload) => {
                        let records = payload
                            .quotes
                            .into_iter()
                            .filter_map(|quote| quote.into_record(url))
                            .collect();
                        Some(records)
                    }
                    Err(e) => {
                        tracing::debug!("Structured payload for {} unusable: {}", endpoint, e);
                        None
                    }
                };
            }
            Ok(response) => {
                tracing::debug!(
                    "Structured fetch {} returned HTTP {} (attempt {}/{})",
                    endpoint,
                    response.status(),
                    attempt + 1,
                    API_RETRIES + 1
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Structured fetch {} failed: {} (attempt {}/{})",
                    endpoint,
                    e,
                    attempt + 1,
                    API_RETRIES + 1
                );
            }
        }
    }

    None
}
