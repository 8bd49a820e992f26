//! Seams between the pipeline and the external data sources.
//!
//! Every method is infallible by signature: implementations absorb their own
//! failures and return the degraded value documented on each method.

use async_trait::async_trait;

use crate::types::{ForumPost, MarketplaceListing};

/// Expands a seed keyword into related search terms.
#[async_trait]
pub trait AutocompleteSource: Send + Sync {
    /// Suggestions in source order. Empty on any failure.
    async fn suggest(&self, seed: &str) -> Vec<String>;
}

/// Marketplace listing lookup.
#[async_trait]
pub trait MarketplaceSource: Send + Sync {
    /// Listing-count text for `keyword`. `Unavailable` on any failure.
    async fn lookup(&self, keyword: &str) -> MarketplaceListing;
}

/// Discussion-forum lookups.
#[async_trait]
pub trait ForumSource: Send + Sync {
    /// Number of scanned post titles containing `keyword`. 0 on any failure.
    async fn count_mentions(&self, keyword: &str) -> u32;

    /// Top posts for `keyword` by relevance. Empty on any failure.
    async fn search_posts(&self, keyword: &str) -> Vec<ForumPost>;
}
