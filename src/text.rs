//! Text normalization helpers
//!
//! Every extractor funnels raw page text through [`clean_text`] so that
//! records carry a canonical form: single-spaced, straight quote glyphs,
//! trimmed. Both functions are pure and infallible.

/// Canonicalizes a piece of extracted text.
///
/// Collapses whitespace runs to a single space, maps curly double quotes
/// (U+201C/U+201D) to `"` and curly single quotes (U+2018/U+2019) to `'`,
/// and trims leading/trailing whitespace. Idempotent: cleaning twice equals
/// cleaning once.
pub fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Strips at most one leading and one trailing quotation mark.
///
/// Listing pages wrap the quote body in literal `"` or `'` glyphs; those are
/// presentation, not content. Interior quotation marks are preserved.
pub fn strip_outer_quote(text: &str) -> &str {
    const GLYPHS: &[char] = &['"', '\''];
    let text = text.strip_prefix(GLYPHS).unwrap_or(text);
    text.strip_suffix(GLYPHS).unwrap_or(text)
}
