//! Reddit API client (client-credentials OAuth).
//!
//! One client is built per run. The access token is exchanged on first use
//! and shared by every keyword task for the rest of the run.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::sync::OnceCell;
use trendradar_core::{ForumPost, ForumSource, RedditCredentials};

use crate::error::SourceError;
use crate::http::{build_http_client, ensure_success, parse_endpoint};
use crate::retry::retry_with_backoff;
use crate::ClientOptions;

use super::reddit_helpers::{count_title_mentions, to_forum_post};

const SEARCH_SUBREDDIT: &str = "all";
/// Posts scanned when counting keyword mentions.
pub const MENTION_SCAN_LIMIT: u32 = 100;
/// Posts returned by the "matching posts" search.
pub const POST_LIST_LIMIT: u32 = 10;

/// Reddit OAuth token response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit search listing wrapper.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Post {
    pub(super) data: PostData,
}

#[derive(Debug, Deserialize)]
pub(super) struct PostData {
    pub(super) title: Option<String>,
    pub(super) permalink: Option<String>,
}

pub struct RedditClient {
    client: Client,
    credentials: Option<RedditCredentials>,
    auth_url: Url,
    search_url: Url,
    token: OnceCell<String>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl RedditClient {
    /// Creates a client. No network traffic happens until the first search.
    ///
    /// `credentials = None` yields a client whose lookups always degrade to
    /// zero mentions and no posts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if either endpoint does not parse,
    /// or [`SourceError::Http`] if the HTTP client cannot be constructed.
    pub fn new(
        auth_url: &str,
        api_url: &str,
        credentials: Option<RedditCredentials>,
        options: &ClientOptions,
    ) -> Result<Self, SourceError> {
        let search_endpoint = format!(
            "{}/r/{SEARCH_SUBREDDIT}/search",
            api_url.trim_end_matches('/')
        );
        Ok(Self {
            client: build_http_client(options)?,
            credentials,
            auth_url: parse_endpoint(auth_url)?,
            search_url: parse_endpoint(&search_endpoint)?,
            token: OnceCell::new(),
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    fn credentials(&self) -> Result<&RedditCredentials, SourceError> {
        self.credentials
            .as_ref()
            .ok_or(SourceError::MissingCredentials)
    }

    /// Cached bearer token, exchanged on first call. A failed exchange is not
    /// cached, so the next keyword tries again.
    async fn access_token(&self) -> Result<&str, SourceError> {
        let credentials = self.credentials()?;
        self.token
            .get_or_try_init(|| self.fetch_token(credentials))
            .await
            .map(String::as_str)
    }

    async fn fetch_token(&self, credentials: &RedditCredentials) -> Result<String, SourceError> {
        let response = self
            .client
            .post(self.auth_url.clone())
            .header(reqwest::header::USER_AGENT, &credentials.user_agent)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Auth(format!(
                "token exchange failed with status {}",
                response.status()
            )));
        }

        let token_resp: TokenResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Auth(format!("token parse error: {e}")))?;

        tracing::debug!("obtained Reddit access token");
        Ok(token_resp.access_token)
    }

    async fn search(&self, keyword: &str, limit: u32) -> Result<Vec<Post>, SourceError> {
        let credentials = self.credentials()?;
        let token = self.access_token().await?;

        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("restrict_sr", "true")
            .append_pair("sort", "relevance")
            .append_pair("limit", &limit.to_string())
            .append_pair("type", "link");

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .bearer_auth(token)
                    .header(reqwest::header::USER_AGENT, &credentials.user_agent)
                    .send()
                    .await?;
                let body = ensure_success(response, "reddit")?.text().await?;

                let listing: Listing =
                    serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                        context: format!("Reddit search listing from {url}"),
                        source: e,
                    })?;
                Ok(listing.data.children)
            }
        })
        .await
    }

    /// Counts how many of the top [`MENTION_SCAN_LIMIT`] results for `keyword`
    /// have a title containing `keyword`, ignoring case.
    ///
    /// # Errors
    ///
    /// - [`SourceError::MissingCredentials`] if the client has no credentials.
    /// - [`SourceError::Auth`] if the token exchange fails.
    /// - [`SourceError::RateLimited`] / [`SourceError::UnexpectedStatus`] / [`SourceError::Http`]
    ///   / [`SourceError::Deserialize`] if the search fails.
    pub async fn try_count_mentions(&self, keyword: &str) -> Result<u32, SourceError> {
        let posts = self.search(keyword, MENTION_SCAN_LIMIT).await?;
        let titles = posts.iter().filter_map(|p| p.data.title.as_deref());
        Ok(count_title_mentions(titles, keyword))
    }

    /// Top [`POST_LIST_LIMIT`] posts for `keyword` by relevance.
    ///
    /// # Errors
    ///
    /// Same as [`RedditClient::try_count_mentions`].
    pub async fn try_search_posts(&self, keyword: &str) -> Result<Vec<ForumPost>, SourceError> {
        let posts = self.search(keyword, POST_LIST_LIMIT).await?;
        Ok(posts.iter().filter_map(to_forum_post).collect())
    }
}

#[async_trait]
impl ForumSource for RedditClient {
    async fn count_mentions(&self, keyword: &str) -> u32 {
        match self.try_count_mentions(keyword).await {
            Ok(count) => {
                tracing::debug!(keyword, mentions = count, "counted Reddit mentions");
                count
            }
            Err(SourceError::MissingCredentials) => {
                tracing::debug!(keyword, "no Reddit credentials, mention count defaults to 0");
                0
            }
            Err(e) => {
                tracing::warn!(
                    keyword,
                    source = "reddit",
                    error = %e,
                    "Reddit mention count failed"
                );
                0
            }
        }
    }

    async fn search_posts(&self, keyword: &str) -> Vec<ForumPost> {
        match self.try_search_posts(keyword).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(
                    keyword,
                    source = "reddit",
                    error = %e,
                    "Reddit post search failed"
                );
                Vec::new()
            }
        }
    }
}
