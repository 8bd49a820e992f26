//! One full scan: seed -> suggestions -> enrichment -> ranking -> report.

use trendradar_core::{AutocompleteSource, ForumSource, Keyword, MarketplaceSource};

use crate::pipeline::{enrich, DEFAULT_WIDTH};
use crate::rank::rank;
use crate::report::RankedReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Suggestions kept from the autocomplete list, in source order.
    pub max_suggestions: usize,
    /// Keywords enriched concurrently.
    pub concurrency: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 10,
            concurrency: DEFAULT_WIDTH,
        }
    }
}

/// The external collaborators for a scan, constructed by the caller.
#[derive(Clone, Copy)]
pub struct Sources<'a> {
    pub autocomplete: &'a dyn AutocompleteSource,
    pub marketplace: &'a dyn MarketplaceSource,
    pub forum: &'a dyn ForumSource,
}

/// Turns raw autocomplete output into at most `limit` keywords. Blank entries
/// are dropped before the limit is applied.
#[must_use]
pub fn candidate_keywords(suggestions: &[String], limit: usize) -> Vec<Keyword> {
    suggestions
        .iter()
        .filter_map(|s| Keyword::parse(s))
        .take(limit)
        .collect()
}

/// Runs a complete scan for `seed`.
///
/// Never fails: every source degrades on its own, and an empty suggestion
/// list yields an empty (but still rendered) report.
pub async fn run_scan(seed: &Keyword, options: ScanOptions, sources: Sources<'_>) -> RankedReport {
    let suggestions = sources.autocomplete.suggest(seed.as_str()).await;
    let keywords = candidate_keywords(&suggestions, options.max_suggestions);

    if keywords.is_empty() {
        tracing::warn!(seed = %seed, "no autocomplete suggestions for seed");
    } else {
        tracing::info!(
            seed = %seed,
            suggestions = suggestions.len(),
            selected = keywords.len(),
            "selected candidate keywords"
        );
    }

    let (records, posts) = tokio::join!(
        enrich(
            &keywords,
            sources.marketplace,
            sources.forum,
            options.concurrency
        ),
        sources.forum.search_posts(seed.as_str()),
    );

    let report = RankedReport::new(seed.clone(), rank(records), posts);

    if let Some(warning) = report.warning() {
        tracing::warn!(seed = %seed, "{warning}");
    }
    tracing::info!(
        seed = %seed,
        records = report.records.len(),
        posts = report.posts.len(),
        "scan complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_keywords_drops_blanks_then_truncates() {
        let raw: Vec<String> = ["a", "  ", "b", "", " c ", "d"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let kws = candidate_keywords(&raw, 3);
        let names: Vec<&str> = kws.iter().map(Keyword::as_str).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn candidate_keywords_zero_limit_is_empty() {
        let raw = vec!["a".to_string()];
        assert!(candidate_keywords(&raw, 0).is_empty());
    }
}
