//! Retry with exponential back-off and jitter for source requests.
//!
//! Only transient failures are retried. Everything else is returned on the
//! first attempt so the caller can degrade the result straight away.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - [`SourceError::RateLimited`]: HTTP 429.
/// - [`SourceError::UnexpectedStatus`] with a 5xx status.
/// - [`SourceError::Http`] timeouts and connection failures.
///
/// **Not retriable:** parse failures, missing fields, 4xx statuses, invalid
/// URLs, and credential problems. Retrying returns the same answer.
pub(crate) fn is_retriable(err: &SourceError) -> bool {
    match err {
        SourceError::RateLimited { .. } => true,
        SourceError::UnexpectedStatus { status, .. } => *status >= 500,
        SourceError::Http(e) => e.is_timeout() || e.is_connect(),
        SourceError::Deserialize { .. }
        | SourceError::MissingField { .. }
        | SourceError::InvalidUrl { .. }
        | SourceError::MissingCredentials
        | SourceError::Auth(_) => false,
    }
}

/// Longest `Retry-After` wait honoured before a retry.
const MAX_RETRY_AFTER_SECS: u64 = 10;
const MAX_DELAY_MS: u64 = 30_000;

/// Delay before retry number `attempt` (1-based).
///
/// A rate-limit response with a `Retry-After` hint waits that long, capped at
/// [`MAX_RETRY_AFTER_SECS`]. Everything else uses the jittered exponential
/// back-off.
fn retry_delay(err: &SourceError, attempt: u32, backoff_base_ms: u64) -> Duration {
    if let SourceError::RateLimited {
        retry_after_secs: Some(secs),
        ..
    } = err
    {
        return Duration::from_secs((*secs).min(MAX_RETRY_AFTER_SECS));
    }

    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// Back-off schedule with `backoff_base_ms = 500`:
///
/// | Attempt | Sleep before next attempt      |
/// |---------|--------------------------------|
/// | 1       | 500 ms × 2⁰ ± 25 % jitter     |
/// | 2       | 500 ms × 2¹ ± 25 % jitter     |
/// | 3       | 500 ms × 2² ± 25 % jitter     |
///
/// Delay is capped at 30 s. A 429 carrying `Retry-After` waits for the hinted
/// time instead (see [`retry_delay`]). With `max_retries = 0` the operation
/// runs once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = retry_delay(&err, attempt, backoff_base_ms);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "transient source error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn rate_limited() -> SourceError {
        SourceError::RateLimited {
            service: "test",
            retry_after_secs: Some(0),
        }
    }

    #[test]
    fn retry_after_hint_sets_delay() {
        let err = SourceError::RateLimited {
            service: "test",
            retry_after_secs: Some(3),
        };
        assert_eq!(retry_delay(&err, 1, 500), Duration::from_secs(3));
    }

    #[test]
    fn retry_after_hint_is_capped() {
        let err = SourceError::RateLimited {
            service: "test",
            retry_after_secs: Some(3_600),
        };
        assert_eq!(
            retry_delay(&err, 1, 500),
            Duration::from_secs(MAX_RETRY_AFTER_SECS)
        );
    }

    #[test]
    fn rate_limit_without_hint_uses_backoff() {
        let err = SourceError::RateLimited {
            service: "test",
            retry_after_secs: None,
        };
        let delay = retry_delay(&err, 2, 400);
        assert!(delay >= Duration::from_millis(600), "{delay:?}");
        assert!(delay <= Duration::from_millis(1_000), "{delay:?}");
    }

    #[test]
    fn backoff_is_capped() {
        let err = SourceError::UnexpectedStatus {
            status: 502,
            url: "https://example.com".to_owned(),
        };
        let delay = retry_delay(&err, 10, 60_000);
        assert!(delay <= Duration::from_millis(MAX_DELAY_MS * 5 / 4), "{delay:?}");
    }

    #[test]
    fn server_errors_are_retriable() {
        assert!(is_retriable(&SourceError::UnexpectedStatus {
            status: 503,
            url: "https://example.com".to_owned(),
        }));
    }

    #[test]
    fn client_errors_are_not_retriable() {
        assert!(!is_retriable(&SourceError::UnexpectedStatus {
            status: 404,
            url: "https://example.com".to_owned(),
        }));
        assert!(!is_retriable(&SourceError::MissingCredentials));
        assert!(!is_retriable(&SourceError::MissingField {
            field: "listing count",
            url: "https://example.com".to_owned(),
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, SourceError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_on_rate_limited_then_succeeds() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(rate_limited())
                } else {
                    Ok::<u32, SourceError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn zero_retries_means_single_attempt() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(0, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SourceError>(rate_limited())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SourceError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_non_retriable_error() {
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(3, 0, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, SourceError>(SourceError::UnexpectedStatus {
                    status: 403,
                    url: "https://example.com/search".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(SourceError::UnexpectedStatus { status: 403, .. })
        ));
    }
}
