/// Client-credentials triple for the forum API.
#[derive(Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl std::fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &"[redacted]")
            .field("client_secret", &"[redacted]")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Upstream endpoints. Overridable so tests can point clients at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub autocomplete_url: String,
    pub marketplace_url: String,
    pub reddit_auth_url: String,
    pub reddit_api_url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_keywords: usize,
    pub max_suggestions: usize,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub endpoints: Endpoints,
    pub reddit: Option<RedditCredentials>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_concurrent_keywords", &self.max_concurrent_keywords)
            .field("max_suggestions", &self.max_suggestions)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("endpoints", &self.endpoints)
            .field("reddit", &self.reddit.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
