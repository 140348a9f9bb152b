use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Upper bound for a single backoff delay.
pub const MAX_RETRY_DELAY_MS: u64 = 5_000;

/// Retries an async operation with exponential backoff
///
/// # Parameters
/// - `operation`: Closure returning a future
/// - `retries`: Number of retry attempts (total runs = 1 initial + retries)
/// - `delay_ms`: Milliseconds before the first retry, doubled for each further
///   retry and capped at [`MAX_RETRY_DELAY_MS`]
/// - `should_retry`: Decides whether a failure is transient. Permanent
///   failures are returned immediately.
///
/// # Returns
/// Either the successful result or the error after all attempts
pub async fn with_retry<F, Fut, T, R>(
    mut operation: F,
    retries: usize,
    delay_ms: u64,
    should_retry: R,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    R: Fn(&anyhow::Error) -> bool,
{
    let mut attempt = 1;
    let mut delay = delay_ms.min(MAX_RETRY_DELAY_MS);
    loop {
        match operation().await {
            Ok(val) => return Ok(val),
            Err(err) => {
                if attempt > retries || !should_retry(&err) {
                    return Err(err);
                }
                debug!(
                    "Attempt {}/{} failed: {:#}. Retrying in {}ms...",
                    attempt, retries, err, delay
                );
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(delay)).await;
                delay = delay.saturating_mul(2).min(MAX_RETRY_DELAY_MS);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicUsize::new(0);
        let result = with_retry(
            || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 { Err(anyhow!("flaky")) } else { Ok(n) }
            },
            3,
            1,
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_bounded_attempts() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("down"))
            },
            2,
            1,
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap_err().to_string(), "down");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("not found"))
            },
            3,
            1,
            |err| !err.to_string().contains("not found"),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
