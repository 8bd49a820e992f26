//! HTTP clients for the external signal sources.
//!
//! Each client exposes fallible `try_*` methods returning [`SourceError`] and
//! implements the matching `trendradar-core` source trait, which logs the
//! error and degrades to the documented default instead of propagating it.

pub mod autocomplete;
pub mod error;
pub mod marketplace;
pub mod reddit;

mod http;
mod parse;
mod reddit_helpers;
mod retry;

pub use autocomplete::AutocompleteClient;
pub use error::SourceError;
pub use marketplace::MarketplaceClient;
pub use reddit::RedditClient;

/// Transport and retry settings shared by every client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure, for transient errors only.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &trendradar_core::AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}
