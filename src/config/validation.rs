//! Configuration validation
//!
//! Rejects configurations that would make a run meaningless (zero quota,
//! zero pages, no workers) before any network work starts. Proxy URLs are
//! deliberately not validated here: the proxy list is an opaque pass-through,
//! and a malformed entry only degrades the structured fetch at request time.

use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Upper bound on the worker pool; beyond this the target site throttles
/// anyway.
const MAX_CONCURRENCY: u32 = 64;

/// Validates a parsed configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.results_wanted == 0 {
        return Err(ConfigError::Validation(
            "crawler.results-wanted must be at least 1".to_string(),
        ));
    }

    if config.crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-pages must be at least 1".to_string(),
        ));
    }

    if config.crawler.max_concurrent_pages == 0 {
        return Err(ConfigError::Validation(
            "crawler.max-concurrent-pages must be at least 1".to_string(),
        ));
    }

    if config.crawler.max_concurrent_pages > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "crawler.max-concurrent-pages must be at most {}",
            MAX_CONCURRENCY
        )));
    }

    if config.output.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output.path must not be empty".to_string(),
        ));
    }

    for raw in &config.source.start_urls {
        Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(toml: &str) -> Config {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn test_valid_minimal_config() {
        let config = config_from(
            r#"
[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_results_wanted_rejected() {
        let config = config_from(
            r#"
[crawler]
results-wanted = 0

[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_pages_rejected() {
        let config = config_from(
            r#"
[crawler]
max-pages = 0

[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_excessive_concurrency_rejected() {
        let config = config_from(
            r#"
[crawler]
max-concurrent-pages = 500

[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_malformed_start_url_rejected() {
        let config = config_from(
            r#"
[source]
start-urls = ["::::"]

[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }

    #[test]
    fn test_malformed_proxy_url_is_accepted() {
        // Proxy entries are opaque; failures surface per-request instead.
        let config = config_from(
            r#"
[proxy]
urls = ["not a proxy url"]

[output]
path = "./quotes.jsonl"
"#,
        );
        assert!(validate(&config).is_ok());
    }
}
