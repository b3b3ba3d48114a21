//! Next-page discovery
//!
//! Determines the URL of the subsequent results page. Explicit navigation
//! markup wins; when the page carries none, the `page` query parameter of the
//! current URL is incremented, which guarantees forward progress on layouts
//! that paginate without links. Absence means "no more pages", never a hard
//! failure.

use crate::urls::to_absolute;
use scraper::{Html, Selector};
use url::Url;

/// Resolves the next-page URL for the current page, if any.
///
/// Priority order:
/// 1. an explicit next-page anchor (`a.next_page`, `div.pagination
///    a.next_page`, or `a[rel="next"]`)
/// 2. the last anchor inside the pagination container, unless its href is
///    empty, a fragment, or a `javascript:` pseudo-link
/// 3. the current URL with its `page` query parameter incremented
pub fn find_next_page(document: &Html, current: &Url) -> Option<Url> {
    if let Some(href) = explicit_next_href(document) {
        if let Some(next) = to_absolute(&href, current) {
            tracing::debug!("Found next page link: {}", next);
            return Some(next);
        }
    }

    if let Some(href) = last_pagination_href(document) {
        if let Some(next) = to_absolute(&href, current) {
            tracing::debug!("Using last pagination link: {}", next);
            return Some(next);
        }
    }

    let next = bump_page_param(current);
    if let Some(ref next) = next {
        tracing::debug!("Constructed next page URL: {}", next);
    }
    next
}

fn explicit_next_href(document: &Html) -> Option<String> {
    let selector =
        Selector::parse("a.next_page, div.pagination a.next_page, a[rel=\"next\"]").ok()?;
    document
        .select(&selector)
        .find_map(|anchor| anchor.value().attr("href"))
        .map(String::from)
}

fn last_pagination_href(document: &Html) -> Option<String> {
    let selector = Selector::parse("div.pagination a[href]").ok()?;
    document
        .select(&selector)
        .last()
        .and_then(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.is_empty() && !href.contains('#') && !href.contains("javascript:"))
        .map(String::from)
}

/// Builds the next-page URL by incrementing the `page` query parameter.
///
/// A missing or unparsable `page` parameter counts as page 1. Other query
/// parameters are preserved in order.
pub fn bump_page_param(current: &Url) -> Option<Url> {
    let mut pairs: Vec<(String, String)> = current
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let current_page: u32 = pairs
        .iter()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(1);
    let next_page = current_page.checked_add(1)?;

    match pairs.iter_mut().find(|(key, _)| key == "page") {
        Some(pair) => pair.1 = next_page.to_string(),
        None => pairs.push(("page".to_string(), next_page.to_string())),
    }

    let mut next = current.clone();
    next.query_pairs_mut().clear().extend_pairs(&pairs);
    Some(next)
}
