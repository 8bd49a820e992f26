//! Per-keyword enrichment across all sources.

use futures::stream::{self, StreamExt};
use trendradar_core::{ForumSource, Keyword, MarketplaceSource, Record};

use crate::scorer::score;
use crate::suggest::suggest;

/// Default number of keywords enriched at once.
pub const DEFAULT_WIDTH: usize = 10;

/// Enrich every keyword with marketplace and forum signals, a score and a
/// product suggestion.
///
/// At most `width` keywords are in flight at once (a width of 0 is treated
/// as 1). Records come back in completion order, not input order; each one
/// carries its input `position` for ranking. Exactly one record is produced
/// per keyword regardless of source failures, which the sources absorb
/// themselves.
pub async fn enrich(
    keywords: &[Keyword],
    marketplace: &dyn MarketplaceSource,
    forum: &dyn ForumSource,
    width: usize,
) -> Vec<Record> {
    if keywords.is_empty() {
        tracing::debug!("no keywords to enrich");
        return Vec::new();
    }

    let width = width.max(1);
    tracing::info!(keywords = keywords.len(), width, "enriching keywords");

    stream::iter(keywords.iter().enumerate())
        .map(|(position, keyword)| enrich_keyword(position, keyword, marketplace, forum))
        .buffer_unordered(width)
        .collect()
        .await
}

async fn enrich_keyword(
    position: usize,
    keyword: &Keyword,
    marketplace: &dyn MarketplaceSource,
    forum: &dyn ForumSource,
) -> Record {
    let (listing, mention_count) = tokio::join!(
        marketplace.lookup(keyword.as_str()),
        forum.count_mentions(keyword.as_str()),
    );

    let score = score(&listing.result, mention_count);
    let suggestion = suggest(keyword.as_str());

    tracing::debug!(
        keyword = %keyword,
        marketplace_available = listing.result.is_available(),
        mention_count,
        score,
        "keyword enriched"
    );

    Record {
        keyword: keyword.clone(),
        marketplace: listing.result,
        mention_count,
        score,
        suggestion: suggestion.to_string(),
        marketplace_url: listing.search_url,
        position,
    }
}
