//! URL resolution and seed construction
//!
//! This module handles:
//! - Resolving possibly-relative hrefs against a base URL
//! - Building the seed URL from the configured tag/author/search terms

use crate::{ConfigError, ConfigResult};
use url::Url;

/// Origin of the target site; base for seed construction and href resolution.
pub const SITE_ORIGIN: &str = "https://www.goodreads.com";

/// Resolves a candidate href to an absolute URL.
///
/// Returns `None` if the href should be discarded:
/// - empty or whitespace-only input
/// - input that cannot be parsed relative to the base
/// - non-HTTP(S) results after resolution
///
/// Absence is the only failure signal; this never errors.
pub fn to_absolute(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    match base.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Parses the site origin as a `Url`.
pub fn site_origin() -> ConfigResult<Url> {
    Url::parse(SITE_ORIGIN).map_err(|e| ConfigError::InvalidUrl(e.to_string()))
}

/// Builds the seed URL from the configured source terms.
///
/// Priority order, matching the target site's listing shapes:
/// 1. `search` term → `/quotes/search?q=<term>`
/// 2. `author` name → `/quotes/search?q=<name>`
/// 3. `tag` → `/quotes/tag/<tag>` (path-segment encoded)
/// 4. none of the above → the bare `/quotes` listing
pub fn build_seed_url(
    tag: Option<&str>,
    author: Option<&str>,
    search: Option<&str>,
) -> ConfigResult<Url> {
    let origin = site_origin()?;

    if let Some(term) = nonempty(search).or(nonempty(author)) {
        let mut seed = origin
            .join("/quotes/search")
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        seed.query_pairs_mut().append_pair("q", term);
        return Ok(seed);
    }

    if let Some(tag) = nonempty(tag) {
        let mut seed = origin
            .join("/quotes/tag")
            .map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;
        seed.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl("cannot-be-a-base origin".to_string()))?
            .push(tag);
        return Ok(seed);
    }

    origin
        .join("/quotes")
        .map_err(|e| ConfigError::InvalidUrl(e.to_string()))
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
