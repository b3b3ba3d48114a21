//! The quote record domain entity

use crate::text::{clean_text, strip_outer_quote};
use serde::Serialize;
use url::Url;

/// A single extracted quote.
///
/// Records are constructed by exactly one extractor per source item, via
/// [`QuoteRecord::build`], and are immutable afterwards. The builder enforces
/// the invariants shared by both extraction paths: normalized text, a stripped
/// outer quotation glyph, a minimum quote length, and the `"Unknown"` author
/// sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRecord {
    /// The quote body, normalized
    pub quote: String,

    /// Author name, or `"Unknown"` when unresolvable
    pub author: String,

    /// Tags in the order encountered on the page
    pub tags: Vec<String>,

    /// Like count, 0 when unparsed
    pub likes: u32,

    /// Source book title, when the page carries a title column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,

    /// Canonical quote URL, always absolute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Minimum quote length; shorter containers are navigational noise, not quotes.
const MIN_QUOTE_CHARS: usize = 10;

impl QuoteRecord {
    /// Builds a record from raw extracted fields.
    ///
    /// Returns `None` when the normalized, glyph-stripped quote text does not
    /// exceed [`MIN_QUOTE_CHARS`] characters. The author is normalized and
    /// defaults to `"Unknown"` when empty; tags and likes are taken as-is.
    pub fn build(
        raw_quote: &str,
        raw_author: &str,
        tags: Vec<String>,
        likes: u32,
        book: Option<String>,
        url: Option<Url>,
    ) -> Option<Self> {
        let quote = strip_outer_quote(&clean_text(raw_quote)).to_string();
        if quote.chars().count() <= MIN_QUOTE_CHARS {
            return None;
        }

        let author = clean_text(raw_author);
        let author = if author.is_empty() {
            "Unknown".to_string()
        } else {
            author
        };

        let book = book.map(|b| clean_text(&b)).filter(|b| !b.is_empty());

        Some(Self {
            quote,
            author,
            tags,
            likes,
            book,
            url: url.map(|u| u.to_string()),
        })
    }

    /// Key used for in-run deduplication.
    pub fn dedup_key(&self) -> String {
        format!("{}_{}", self.quote, self.author)
    }
}
