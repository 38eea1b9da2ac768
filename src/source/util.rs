use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// How often a failed download is attempted again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one
    pub retries: usize,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: usize, delay_ms: u64) -> Self {
        RetryPolicy {
            retries,
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Failures another attempt may fix: timeouts, refused or reset
/// connections and a body cut off mid-transfer. Builder and decode errors
/// fail the same way every time.
pub fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}

/// Runs `attempt` until it succeeds, hits a non-transient error or the
/// policy runs out of retries. The last error is returned as is.
pub async fn with_retry<F, Fut, T>(mut attempt: F, policy: RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let total = policy.retries + 1;
    let mut n = 1;
    loop {
        match attempt().await {
            Ok(val) => return Ok(val),
            Err(err) if n >= total || !is_transient(&err) => return Err(err.into()),
            Err(err) => {
                debug!(
                    "Download attempt {}/{} failed: {}. Retrying in {:?}",
                    n, total, err, policy.delay
                );
                n += 1;
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
