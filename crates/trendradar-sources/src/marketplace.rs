//! Marketplace search-page client.
//!
//! Fetches the public search results page for a keyword and pulls the
//! human-readable result count out of the HTML. The raw text is handed on
//! untouched; turning it into a number is the scorer's job.

use async_trait::async_trait;
use reqwest::{Client, Url};
use trendradar_core::{MarketplaceListing, MarketplaceSource, SourceResult};

use crate::error::SourceError;
use crate::http::{build_http_client, ensure_success, parse_endpoint};
use crate::parse::extract_listing_text;
use crate::retry::retry_with_backoff;
use crate::ClientOptions;

pub struct MarketplaceClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl MarketplaceClient {
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if `endpoint` does not parse, or
    /// [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn new(endpoint: &str, options: &ClientOptions) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_http_client(options)?,
            endpoint: parse_endpoint(endpoint)?,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Public search URL for `keyword` (spaces encoded as `+`).
    #[must_use]
    pub fn search_url(&self, keyword: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("q", keyword);
        url
    }

    /// Fetches the search page for `keyword` and returns the listing-count text.
    ///
    /// # Errors
    ///
    /// - [`SourceError::RateLimited`] / [`SourceError::UnexpectedStatus`] for non-2xx responses.
    /// - [`SourceError::MissingField`] if the page has no listing-count element.
    /// - [`SourceError::Http`] for network failures and timeouts.
    pub async fn try_lookup(&self, keyword: &str) -> Result<String, SourceError> {
        let url = self.search_url(keyword);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;
                let html = ensure_success(response, "marketplace")?.text().await?;

                extract_listing_text(&html).ok_or_else(|| SourceError::MissingField {
                    field: "listing count element",
                    url: url.to_string(),
                })
            }
        })
        .await
    }
}

#[async_trait]
impl MarketplaceSource for MarketplaceClient {
    async fn lookup(&self, keyword: &str) -> MarketplaceListing {
        let search_url = self.search_url(keyword).to_string();
        match self.try_lookup(keyword).await {
            Ok(text) => {
                tracing::debug!(keyword, listing_text = %text, "marketplace lookup succeeded");
                MarketplaceListing {
                    result: SourceResult::Success {
                        text,
                        url: Some(search_url.clone()),
                    },
                    search_url: Some(search_url),
                }
            }
            Err(e) => {
                tracing::warn!(
                    keyword,
                    source = "marketplace",
                    error = %e,
                    "marketplace lookup failed"
                );
                MarketplaceListing::unavailable(Some(search_url))
            }
        }
    }
}
