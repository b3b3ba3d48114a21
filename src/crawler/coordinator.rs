//! Crawl coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that ties the pieces together:
//! - seeding the task set from the configuration
//! - one record-producing pass per page: structured fetch, markup fallback,
//!   dedup, quota enforcement, batched sink write
//! - pagination until quota, page cap, or exhaustion
//!
//! Each page is a [`PageTask`] processed by a bounded worker pool; a task may
//! enqueue at most one successor (its next page), and the run terminates when
//! the task set drains.

use crate::config::Config;
use crate::crawler::api::fetch_structured;
use crate::crawler::extract::extract_quotes;
use crate::crawler::fetcher::{build_http_client, fetch_page, ProxyPool};
use crate::crawler::pagination::find_next_page;
use crate::output::{open_sink, RecordSink};
use crate::record::QuoteRecord;
use crate::state::CrawlState;
use crate::Result;
use reqwest::Client;
use scraper::Html;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// One unit of pagination work: a URL and its 1-based page number.
#[derive(Debug, Clone)]
pub struct PageTask {
    pub url: Url,
    pub page_no: u32,
}

/// End-of-run statistics.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Pages whose task ran to completion (including dropped-at-entry tasks)
    pub pages_processed: u64,

    /// Records accepted and written to the sink
    pub records_saved: usize,
}

/// Deadline for one full page task (fetch, extract, emit).
const TASK_TIMEOUT: Duration = Duration::from_secs(60);

/// Main crawl coordinator.
///
/// Cheap to clone; all shared pieces are behind `Arc` so page tasks can be
/// spawned onto the runtime.
#[derive(Clone)]
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    state: Arc<CrawlState>,
    sink: Arc<Mutex<Box<dyn RecordSink>>>,
    proxies: Option<Arc<ProxyPool>>,
    semaphore: Arc<Semaphore>,
}

impl Coordinator {
    /// Creates a coordinator: builds the HTTP client, opens the output sink,
    /// and initializes run state.
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.crawler.user_agent)?;
        let sink = open_sink(&config.output)?;
        let state = CrawlState::new(config.crawler.results_wanted as usize);
        let proxies = ProxyPool::from_urls(&config.proxy.urls).map(Arc::new);
        let semaphore = Arc::new(Semaphore::new(config.crawler.max_concurrent_pages as usize));

        Ok(Self {
            config: Arc::new(config),
            client,
            state: Arc::new(state),
            sink: Arc::new(Mutex::new(sink)),
            proxies,
            semaphore,
        })
    }

    /// Runs the crawl to completion.
    ///
    /// Seeds one page-1 task per seed URL, then keeps spawning successor
    /// tasks until the set drains. A panicking or failing task terminates its
    /// pagination branch only, never the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let seeds = self.config.seed_urls()?;
        tracing::info!("Starting crawl with {} seed URL(s)", seeds.len());

        let start_time = std::time::Instant::now();
        let mut join_set = JoinSet::new();

        for url in seeds {
            let coordinator = self.clone();
            join_set.spawn(async move { coordinator.process_task(PageTask { url, page_no: 1 }).await });
        }

        let mut pages_processed = 0u64;
        while let Some(joined) = join_set.join_next().await {
            pages_processed += 1;
            match joined {
                Ok(Some(next)) => {
                    let coordinator = self.clone();
                    join_set.spawn(async move { coordinator.process_task(next).await });
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Page task panicked: {}", e),
            }
        }

        self.sink.lock().unwrap().finish()?;

        let summary = RunSummary {
            pages_processed,
            records_saved: self.state.saved(),
        };
        tracing::info!(
            "Crawl completed: {} pages processed, {} quotes saved in {:?}",
            summary.pages_processed,
            summary.records_saved,
            start_time.elapsed()
        );

        Ok(summary)
    }

    /// Processes one page task; returns the successor task, if pagination
    /// continues.
    ///
    /// All failures are contained here: a fetch that exhausts its retries or
    /// overruns the task deadline ends this pagination branch with a warning.
    async fn process_task(self, task: PageTask) -> Option<PageTask> {
        // Early termination: quota met before this task got a worker.
        if self.state.is_full() {
            tracing::debug!("Quota reached, dropping page {} without fetch", task.page_no);
            return None;
        }

        let _permit = self.semaphore.acquire().await.ok()?;

        tracing::info!("Processing page {}: {}", task.page_no, task.url);
        match tokio::time::timeout(TASK_TIMEOUT, self.crawl_page(&task)).await {
            Ok(Ok(next)) => next,
            Ok(Err(e)) => {
                tracing::warn!("Page {} ({}) failed: {}", task.page_no, task.url, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Page {} ({}) exceeded the {:?} task deadline",
                    task.page_no,
                    task.url,
                    TASK_TIMEOUT
                );
                None
            }
        }
    }

    /// One record-producing pass over a single page.
    async fn crawl_page(&self, task: &PageTask) -> Result<Option<PageTask>> {
        let body = fetch_page(&self.client, task.url.as_str()).await?;

        // Structured endpoint first; markup parsing is the fallback. Exactly
        // one extractor's output is used per page, never a merge.
        let structured = fetch_structured(
            &self.client,
            self.proxies.as_deref(),
            &self.config.crawler.user_agent,
            &task.url,
            task.page_no,
        )
        .await;

        let (records, next_url) = extract_phase(&body, task, structured);
        tracing::info!(
            "Extracted {} quotes from page {}",
            records.len(),
            task.page_no
        );

        // Dedup and quota are enforced per record; the quota is a hard cap,
        // so acceptance may stop mid-page.
        let mut batch = Vec::new();
        for record in records {
            if self.state.is_full() {
                break;
            }
            if self.state.try_accept(&record.dedup_key()) {
                batch.push(record);
            }
        }

        if !batch.is_empty() {
            let saved = {
                let mut sink = self.sink.lock().unwrap();
                sink.write_batch(&batch)?;
                self.state.saved()
            };
            tracing::info!(
                "Saved {} new quotes from page {} (total: {})",
                batch.len(),
                task.page_no,
                saved
            );
        }

        if self.state.is_full() {
            tracing::info!("Reached desired quote count, stopping pagination");
            return Ok(None);
        }
        if task.page_no >= self.config.crawler.max_pages {
            tracing::info!(
                "Page cap reached ({}/{}), stopping pagination",
                task.page_no,
                self.config.crawler.max_pages
            );
            return Ok(None);
        }

        match next_url {
            Some(url) => Ok(Some(PageTask {
                url,
                page_no: task.page_no + 1,
            })),
            None => {
                tracing::info!("No next page found for {}", task.url);
                Ok(None)
            }
        }
    }
}

/// Synchronous extraction pass over the fetched body.
///
/// The parsed document is confined to this function so it never lives across
/// an await point. When the structured fetch produced records they are used
/// as-is and the markup is only consulted for pagination.
fn extract_phase(
    body: &str,
    task: &PageTask,
    structured: Option<Vec<QuoteRecord>>,
) -> (Vec<QuoteRecord>, Option<Url>) {
    let document = Html::parse_document(body);

    let records = match structured {
        Some(records) => {
            tracing::debug!("Structured endpoint returned {} quotes", records.len());
            records
        }
        None => {
            tracing::debug!("Structured endpoint unavailable, parsing markup");
            extract_quotes(&document, &task.url)
        }
    };

    let next_url = find_next_page(&document, &task.url);
    (records, next_url)
}

/// Runs the main crawl operation for a configuration.
pub async fn run_crawl(config: Config) -> Result<RunSummary> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
