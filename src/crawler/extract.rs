//! Markup extraction of quote records
//!
//! Parses listing-page markup into quote records. The site has shipped a few
//! container layouts over the years, so the container match is an OR across
//! the known patterns, and every field inside a container is extracted
//! independently: one malformed container is skipped without affecting the
//! rest of the page.

use crate::record::QuoteRecord;
use crate::urls::to_absolute;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Known container layouts, matched as one selector list. A node matching
/// several patterns is yielded once.
const CONTAINER_PATTERNS: &str = "div.quote, div.quoteDetails, .quote, .quoteDetails";

/// Extracts all quote records from a parsed listing page.
///
/// Containers that do not yield a qualifying quote (navigation blocks,
/// sidebar fragments, quotes at or under the length gate) are silently
/// skipped; that is expected page noise, not an error.
pub fn extract_quotes(document: &Html, base: &Url) -> Vec<QuoteRecord> {
    let Ok(container_sel) = Selector::parse(CONTAINER_PATTERNS) else {
        return Vec::new();
    };

    let selectors = match FieldSelectors::new() {
        Some(s) => s,
        None => return Vec::new(),
    };

    let containers: Vec<ElementRef> = document.select(&container_sel).collect();
    tracing::debug!("Found {} quote containers on page", containers.len());

    let mut records = Vec::new();
    for container in containers {
        match extract_one(container, &selectors, base) {
            Some(record) => records.push(record),
            None => tracing::debug!("Skipping container without a qualifying quote"),
        }
    }

    tracing::debug!("Extracted {} quotes from markup", records.len());
    records
}

/// Compiled selectors and the likes pattern, built once per page.
struct FieldSelectors {
    quote_text: Selector,
    author_span: Selector,
    book_anchor: Selector,
    tag_region: Selector,
    likes_region: Selector,
    any_anchor: Selector,
    likes_re: Regex,
}

impl FieldSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            quote_text: Selector::parse("div.quoteText").ok()?,
            author_span: Selector::parse("span.authorOrTitle").ok()?,
            book_anchor: Selector::parse("a.authorOrTitle").ok()?,
            tag_region: Selector::parse("div.greyText.smallText.left a").ok()?,
            likes_region: Selector::parse("div.right").ok()?,
            any_anchor: Selector::parse("a[href]").ok()?,
            likes_re: Regex::new(r"(?i)(\d+)\s*likes?").ok()?,
        })
    }
}

/// Extracts a single record from one container, or `None` if the container
/// does not hold a qualifying quote.
fn extract_one(
    container: ElementRef,
    selectors: &FieldSelectors,
    base: &Url,
) -> Option<QuoteRecord> {
    let quote_text = extract_quote_text(container, &selectors.quote_text);

    let author = container
        .select(&selectors.author_span)
        .next()
        .map(|span| strip_leading_comma(&span.text().collect::<String>()))
        .unwrap_or_default();

    let book = container
        .select(&selectors.book_anchor)
        .next()
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty());

    let tags: Vec<String> = container
        .select(&selectors.tag_region)
        .filter(|anchor| {
            anchor
                .value()
                .attr("href")
                .is_some_and(|href| href.contains("/quotes/tag/"))
        })
        .map(|anchor| anchor.text().collect::<String>().trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let likes_text: String = container
        .select(&selectors.likes_region)
        .flat_map(|region| region.text())
        .collect();
    let likes = selectors
        .likes_re
        .captures(&likes_text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    let url = container
        .select(&selectors.any_anchor)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| href.contains("/quotes/"))
        .and_then(|href| to_absolute(href, base));

    QuoteRecord::build(&quote_text, &author, tags, likes, book, url)
}

/// Pulls the quote body out of the designated text node.
///
/// Prefers the node's direct text content with nested child elements
/// excluded — that drops embedded "(more)" links and author sub-markup —
/// and falls back to the full text when the trimmed form is empty.
fn extract_quote_text(container: ElementRef, quote_sel: &Selector) -> String {
    let Some(node) = container.select(quote_sel).next() else {
        return String::new();
    };

    let direct: String = node
        .children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
        .collect();

    if direct.trim().is_empty() {
        node.text().collect()
    } else {
        direct
    }
}

/// Strips a single leading comma-and-space sequence from the author span.
fn strip_leading_comma(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(',')
        .map(str::trim_start)
        .unwrap_or(trimmed)
        .to_string()
}
