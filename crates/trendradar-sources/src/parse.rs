//! Response-body extraction for the autocomplete and marketplace sources.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Class carried by the element that wraps the marketplace result count.
pub(crate) const LISTING_COUNT_CLASS: &str = "wt-display-inline-flex-sm";

static SPAN_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span\b[^>]*?\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("valid span regex")
});

/// Any opening or closing `span` tag. Group 1 is `/` for a closing tag.
static SPAN_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(/?)span\b[^>]*>").expect("valid span tag regex"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

/// Parses the suggest endpoint body: `[seed, [suggestion, ...], ...]`.
///
/// Returns `None` when the body is not JSON or element 1 is not an array.
/// Non-string entries inside the array are skipped.
pub(crate) fn parse_suggestions(body: &str) -> Result<Option<Vec<String>>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    let suggestions = value.get(1).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect()
    });
    Ok(suggestions)
}

/// Text of the first listing-count element in a search results page.
///
/// Nested markup is stripped and whitespace collapsed. Returns `None` if the
/// element is absent or has no visible text.
pub(crate) fn extract_listing_text(html: &str) -> Option<String> {
    SPAN_OPEN_RE
        .captures_iter(html)
        .filter(|cap| {
            cap.get(1).is_some_and(|classes| {
                classes
                    .as_str()
                    .split_whitespace()
                    .any(|c| c == LISTING_COUNT_CLASS)
            })
        })
        .find_map(|cap| cap.get(0).map(|open| clean_text(span_body(html, open.end()))))
        .filter(|text| !text.is_empty())
}

/// Inner HTML of a span whose opening tag ends at `start`, up to the matching
/// `</span>`. Nested spans are tracked by depth. An unclosed span runs to the
/// end of the document.
fn span_body(html: &str, start: usize) -> &str {
    let rest = &html[start..];
    let mut depth = 1usize;
    for tag in SPAN_TAG_RE.captures_iter(rest) {
        let closing = tag.get(1).is_some_and(|slash| !slash.as_str().is_empty());
        if closing {
            depth -= 1;
            if depth == 0 {
                if let Some(whole) = tag.get(0) {
                    return &rest[..whole.start()];
                }
            }
        } else {
            depth += 1;
        }
    }
    rest
}

fn clean_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&#44;", ",")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
