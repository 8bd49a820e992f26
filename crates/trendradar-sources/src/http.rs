//! Shared HTTP plumbing for the source clients.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};

use crate::error::SourceError;
use crate::ClientOptions;

/// Builds a `reqwest::Client` with the configured per-call timeout and `User-Agent`.
pub(crate) fn build_http_client(options: &ClientOptions) -> Result<Client, SourceError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(options.timeout_secs))
        .connect_timeout(Duration::from_secs(options.timeout_secs.min(10)))
        .user_agent(&options.user_agent)
        .build()?;
    Ok(client)
}

/// Parses a configured endpoint, rejecting anything that cannot carry a query string.
pub(crate) fn parse_endpoint(raw: &str) -> Result<Url, SourceError> {
    let url = Url::parse(raw).map_err(|e| SourceError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(SourceError::InvalidUrl {
            url: raw.to_owned(),
            reason: "not an http(s) base URL".to_owned(),
        });
    }
    Ok(url)
}

/// Maps 429 and other non-2xx responses to typed errors.
pub(crate) fn ensure_success(
    response: Response,
    service: &'static str,
) -> Result<Response, SourceError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());
        return Err(SourceError::RateLimited {
            service,
            retry_after_secs,
        });
    }

    if !status.is_success() {
        return Err(SourceError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }

    Ok(response)
}
