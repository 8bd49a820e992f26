//! Niche opportunity score.
//!
//! Forum mentions stand in for demand, marketplace listing count for
//! saturation. The weights are fixed so that the same inputs always give the
//! same integer.

use std::sync::LazyLock;

use regex::Regex;
use trendradar_core::SourceResult;

/// Points per forum mention.
pub const MENTION_WEIGHT: i64 = 10;
/// Listing count at which the saturation bonus reaches zero.
pub const SATURATION_CEILING: i64 = 1_000;
/// Listing count assumed when the marketplace text is missing or unparseable.
/// Unknown markets are treated as saturated.
pub const FALLBACK_LISTING_COUNT: u64 = 100_000;

static DIGIT_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:,[0-9]+)*").expect("valid digit-run regex"));

/// First run of ASCII digits in `text`, with `,` grouping separators removed.
///
/// `"1,234 results"` gives `Some(1234)`, `"About 50 items"` gives `Some(50)`.
/// Returns `None` when there are no digits or the number overflows `u64`.
#[must_use]
pub fn parse_listing_count(text: &str) -> Option<u64> {
    let run = DIGIT_RUN_RE.find(text)?;
    run.as_str().replace(',', "").parse::<u64>().ok()
}

/// Listing count used for scoring, with the fallback applied.
#[must_use]
pub fn listing_count(marketplace: &SourceResult) -> u64 {
    marketplace
        .text()
        .and_then(parse_listing_count)
        .unwrap_or(FALLBACK_LISTING_COUNT)
}

/// `mentions * 10 + max(0, 1000 - listings)`.
#[must_use]
pub fn score(marketplace: &SourceResult, mention_count: u32) -> i64 {
    let listings = i64::try_from(listing_count(marketplace)).unwrap_or(i64::MAX);
    let saturation_bonus = SATURATION_CEILING.saturating_sub(listings).max(0);
    i64::from(mention_count) * MENTION_WEIGHT + saturation_bonus
}
