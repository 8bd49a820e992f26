use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {service}")]
    RateLimited {
        service: &'static str,
        /// `Retry-After` in seconds, when the server sent a numeric value.
        retry_after_secs: Option<u64>,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{field} not found in response from {url}")]
    MissingField { field: &'static str, url: String },

    #[error("invalid endpoint URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no Reddit credentials configured")]
    MissingCredentials,

    #[error("Reddit auth error: {0}")]
    Auth(String),
}
