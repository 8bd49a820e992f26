use crate::app_config::{AppConfig, Endpoints, RedditCredentials};
use crate::ConfigError;

pub const DEFAULT_AUTOCOMPLETE_URL: &str = "https://suggestqueries.google.com/complete/search";
pub const DEFAULT_MARKETPLACE_URL: &str = "https://www.etsy.com/search";
pub const DEFAULT_REDDIT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_REDDIT_API_URL: &str = "https://oauth.reddit.com";

/// Upper bound for `TRENDRADAR_MAX_SUGGESTIONS`.
pub const MAX_SUGGESTIONS_LIMIT: usize = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parsing and validation, decoupled from the real environment so tests can
/// feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("TRENDRADAR_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("TRENDRADAR_REQUEST_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("TRENDRADAR_USER_AGENT", "Mozilla/5.0");

    let max_concurrent_keywords = parse_usize("TRENDRADAR_MAX_CONCURRENT_KEYWORDS", "10")?;
    if max_concurrent_keywords == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDRADAR_MAX_CONCURRENT_KEYWORDS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let max_suggestions = parse_usize("TRENDRADAR_MAX_SUGGESTIONS", "10")?;
    if !(1..=MAX_SUGGESTIONS_LIMIT).contains(&max_suggestions) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRENDRADAR_MAX_SUGGESTIONS".to_string(),
            reason: format!("must be between 1 and {MAX_SUGGESTIONS_LIMIT}"),
        });
    }

    let max_retries = parse_u32("TRENDRADAR_MAX_RETRIES", "0")?;
    let retry_backoff_base_ms = parse_u64("TRENDRADAR_RETRY_BACKOFF_BASE_MS", "500")?;

    let endpoints = Endpoints {
        autocomplete_url: or_default("TRENDRADAR_AUTOCOMPLETE_URL", DEFAULT_AUTOCOMPLETE_URL),
        marketplace_url: or_default("TRENDRADAR_MARKETPLACE_URL", DEFAULT_MARKETPLACE_URL),
        reddit_auth_url: or_default("TRENDRADAR_REDDIT_AUTH_URL", DEFAULT_REDDIT_AUTH_URL),
        reddit_api_url: or_default("TRENDRADAR_REDDIT_API_URL", DEFAULT_REDDIT_API_URL),
    };

    let reddit = reddit_credentials(
        lookup("REDDIT_CLIENT_ID").ok(),
        lookup("REDDIT_CLIENT_SECRET").ok(),
        lookup("REDDIT_USER_AGENT").ok(),
    );

    Ok(AppConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_keywords,
        max_suggestions,
        max_retries,
        retry_backoff_base_ms,
        endpoints,
        reddit,
    })
}

/// Credentials are all-or-nothing. A partial set disables forum lookups
/// rather than failing the load.
fn reddit_credentials(
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
) -> Option<RedditCredentials> {
    let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    let missing: Vec<&str> = [
        ("REDDIT_CLIENT_ID", present(&client_id)),
        ("REDDIT_CLIENT_SECRET", present(&client_secret)),
        ("REDDIT_USER_AGENT", present(&user_agent)),
    ]
    .into_iter()
    .filter_map(|(name, ok)| (!ok).then_some(name))
    .collect();

    match (client_id, client_secret, user_agent) {
        (Some(client_id), Some(client_secret), Some(user_agent)) if missing.is_empty() => {
            Some(RedditCredentials {
                client_id,
                client_secret,
                user_agent,
            })
        }
        _ => {
            if missing.len() < 3 {
                tracing::warn!(
                    missing = %missing.join(", "),
                    "incomplete Reddit credentials; forum lookups disabled"
                );
            }
            None
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
