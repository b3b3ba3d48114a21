//! Crawler module: fetching, extraction, and pagination
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic and optional per-request proxies
//! - The structured (JSON endpoint) fetch attempt
//! - Markup extraction across the site's historical layout variants
//! - Next-page discovery
//! - Overall crawl coordination and quota enforcement

mod api;
mod coordinator;
mod extract;
mod fetcher;
mod pagination;

pub use api::{derive_endpoint, fetch_structured};
pub use coordinator::{run_crawl, Coordinator, PageTask, RunSummary};
pub use extract::extract_quotes;
pub use fetcher::{build_http_client, fetch_page, ProxyPool};
pub use pagination::{bump_page_param, find_next_page};

use crate::config::Config;
use crate::ScrapeError;

/// Runs a complete crawl operation.
///
/// This is the main entry point for starting a crawl: it resolves the seed
/// URLs, opens the output sink, processes pages until the quota, page cap,
/// or pagination is exhausted, and reports a run summary.
pub async fn crawl(config: Config) -> Result<RunSummary, ScrapeError> {
    run_crawl(config).await
}
