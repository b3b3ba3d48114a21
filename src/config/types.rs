use crate::urls::build_seed_url;
use crate::ConfigResult;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for quotegrab
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    pub output: OutputConfig,
}

/// Where the crawl starts: either explicit seed URLs or a derived listing URL
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    /// Tag to list quotes for (builds a tag-listing seed URL)
    pub tag: Option<String>,

    /// Author name to search for
    pub author: Option<String>,

    /// Free-text search term (takes priority over `author`)
    pub search: Option<String>,

    /// Explicit seed URLs; when non-empty, these override the derived seed
    #[serde(rename = "start-urls", default)]
    pub start_urls: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Total number of records to collect before the run stops
    #[serde(rename = "results-wanted", default = "default_results_wanted")]
    pub results_wanted: u32,

    /// Maximum number of listing pages to follow per seed
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Maximum number of concurrent page fetches
    #[serde(rename = "max-concurrent-pages", default = "default_concurrency")]
    pub max_concurrent_pages: u32,

    /// User agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Optional proxy pool; URLs are handed out round-robin, one per request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// Output sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the output file (JSON Lines) or database (SQLite)
    pub path: String,

    /// Sink format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Supported output sink formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Sqlite,
}

fn default_results_wanted() -> u32 {
    100
}

fn default_max_pages() -> u32 {
    20
}

fn default_concurrency() -> u32 {
    5
}

fn default_user_agent() -> String {
    format!("quotegrab/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            results_wanted: default_results_wanted(),
            max_pages: default_max_pages(),
            max_concurrent_pages: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Resolves the seed URLs for a run.
    ///
    /// Explicit `start-urls` win; otherwise one seed is derived from the
    /// search/author/tag terms (in that priority order), falling back to the
    /// site's bare quotes listing.
    pub fn seed_urls(&self) -> ConfigResult<Vec<Url>> {
        if !self.source.start_urls.is_empty() {
            return self
                .source
                .start_urls
                .iter()
                .map(|raw| {
                    Url::parse(raw)
                        .map_err(|e| crate::ConfigError::InvalidUrl(format!("{}: {}", raw, e)))
                })
                .collect();
        }

        let seed = build_seed_url(
            self.source.tag.as_deref(),
            self.source.author.as_deref(),
            self.source.search.as_deref(),
        )?;
        Ok(vec![seed])
    }
}
