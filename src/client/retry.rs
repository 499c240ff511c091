//! Retry logic with exponential backoff.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::Error;

/// Parameters for exponential backoff.
#[derive(Debug, Clone)]
pub struct BackoffParams {
    /// Initial delay in milliseconds
    pub initial_ms: u64,
    /// Multiplier for each retry
    pub mult: f64,
    /// Maximum delay in milliseconds
    pub max_ms: u64,
    /// Maximum number of tries (None = unlimited)
    pub max_tries: Option<u32>,
    /// Maximum total time in milliseconds (None = unlimited)
    pub max_total_ms: Option<u64>,
}

impl Default for BackoffParams {
    fn default() -> Self {
        Self {
            initial_ms: 100,
            mult: 2.0,
            max_ms: 30_000,
            max_tries: Some(5),
            max_total_ms: Some(60_000),
        }
    }
}

impl BackoffParams {
    /// Params for long sync runs: page requests may hit rate limits mid-feed.
    pub fn for_sync() -> Self {
        Self {
            initial_ms: 500,
            mult: 2.0,
            max_ms: 60_000,
            max_tries: Some(10),
            max_total_ms: Some(300_000),
        }
    }
}

/// Retry a function with exponential backoff.
///
/// # Arguments
///
/// * `f` - The async function to retry
/// * `can_retry` - Function to check if an error is retriable
/// * `params` - Backoff parameters
/// * `enable_debug` - Enable debug logging
///
/// # Returns
///
/// The result of the function, or the last error if all retries failed.
pub async fn retry_with_backoff<F, Fut, T, E, R>(
    mut f: F,
    can_retry: R,
    params: &BackoffParams,
    enable_debug: bool,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
    E: std::fmt::Debug,
{
    let start_time = std::time::Instant::now();
    let mut backoff_ms = 0u64;
    let mut tries = 0u32;

    loop {
        match f().await {
            Ok(result) => {
                if tries > 0 && enable_debug {
                    debug!("Operation succeeded after {} transient failures", tries);
                }
                return Ok(result);
            }
            Err(e) => {
                tries += 1;

                // Check max tries
                if let Some(max) = params.max_tries {
                    if tries >= max {
                        return Err(e);
                    }
                }

                // Check if retriable
                if !can_retry(&e) {
                    return Err(e);
                }

                // Calculate backoff
                backoff_ms = if backoff_ms == 0 {
                    params.initial_ms
                } else {
                    ((backoff_ms as f64) * params.mult).min(params.max_ms as f64) as u64
                };

                // Check max total time
                if let Some(max_total) = params.max_total_ms {
                    let elapsed = start_time.elapsed().as_millis() as u64;
                    if elapsed + backoff_ms > max_total {
                        return Err(e);
                    }
                }

                if enable_debug {
                    debug!(
                        "Operation failed with error {:?}, retrying in {} ms; retries = {}",
                        e, backoff_ms, tries
                    );
                }

                sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

/// Retry with the default retriable error check.
pub async fn retry_api<F, Fut, T>(f: F, params: &BackoffParams, debug: bool) -> crate::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = crate::Result<T>>,
{
    retry_with_backoff(f, |e: &Error| e.is_retriable(), params, debug).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_success_on_first_try() {
        let result: Result<u32, Error> = retry_api(
            || async { Ok(7) },
            &BackoffParams::default(),
            false,
        )
        .await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let calls = Cell::new(0u32);
        let params = BackoffParams {
            initial_ms: 1,
            mult: 1.0,
            max_ms: 1,
            max_tries: Some(5),
            max_total_ms: None,
        };

        let result = retry_api(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        Err(Error::api(503, "Service Unavailable", ""))
                    } else {
                        Ok("done")
                    }
                }
            },
            &params,
            false,
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn test_non_retriable_error_returns_immediately() {
        let calls = Cell::new(0u32);
        let result: crate::Result<()> = retry_api(
            || {
                calls.set(calls.get() + 1);
                async { Err(Error::api(404, "Not Found", "")) }
            },
            &BackoffParams::default(),
            false,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_max_tries_exhausted() {
        let calls = Cell::new(0u32);
        let params = BackoffParams {
            initial_ms: 1,
            mult: 1.0,
            max_ms: 1,
            max_tries: Some(3),
            max_total_ms: None,
        };

        let result: crate::Result<()> = retry_api(
            || {
                calls.set(calls.get() + 1);
                async { Err(Error::api(500, "Internal Server Error", "")) }
            },
            &params,
            false,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }
}
