//! Search-engine autocomplete client used to expand the seed keyword.

use async_trait::async_trait;
use reqwest::{Client, Url};
use trendradar_core::AutocompleteSource;

use crate::error::SourceError;
use crate::http::{build_http_client, ensure_success, parse_endpoint};
use crate::parse::parse_suggestions;
use crate::retry::retry_with_backoff;
use crate::ClientOptions;

pub struct AutocompleteClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl AutocompleteClient {
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

    fn suggest_url(&self, seed: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client", "firefox")
            .append_pair("q", seed);
        url
    }

    /// Fetches autocomplete suggestions for `seed`, in the order the service returns them.
    ///
    /// # Errors
    ///
    /// - [`SourceError::RateLimited`] / [`SourceError::UnexpectedStatus`] for non-2xx responses.
    /// - [`SourceError::Deserialize`] if the body is not JSON.
    /// - [`SourceError::MissingField`] if the suggestion array is absent.
    /// - [`SourceError::Http`] for network failures.
    pub async fn try_suggest(&self, seed: &str) -> Result<Vec<String>, SourceError> {
        let url = self.suggest_url(seed);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let body = ensure_success(response, "autocomplete")?.text().await?;

                parse_suggestions(&body)
                    .map_err(|e| SourceError::Deserialize {
                        context: format!("autocomplete response from {url}"),
                        source: e,
                    })?
                    .ok_or_else(|| SourceError::MissingField {
                        field: "suggestion list",
                        url: url.to_string(),
                    })
            }
        })
        .await
    }
}

#[async_trait]
impl AutocompleteSource for AutocompleteClient {
    async fn suggest(&self, seed: &str) -> Vec<String> {
        match self.try_suggest(seed).await {
            Ok(suggestions) => {
                tracing::debug!(seed, count = suggestions.len(), "fetched autocomplete suggestions");
                suggestions
            }
            Err(e) => {
                tracing::warn!(
                    seed,
                    source = "autocomplete",
                    error = %e,
                    "autocomplete fetch failed"
                );
                Vec::new()
            }
        }
    }
}
