use crate::source::util::{RetryPolicy, with_retry};
use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, info, instrument};

const USER_AGENT: &str = concat!("fxdate/", env!("CARGO_PKG_VERSION"));

/// Downloads the rate archive.
///
/// Each attempt, body included, is bounded by the timeout. Timeouts and
/// connection failures are retried; an HTTP error status fails immediately.
pub struct ZipDownloader {
    url: String,
    policy: RetryPolicy,
    timeout: Duration,
}

impl ZipDownloader {
    pub fn new(url: &str) -> Self {
        ZipDownloader {
            url: url.to_string(),
            policy: RetryPolicy::new(3, 500),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_retries(mut self, retries: usize, retry_delay_ms: u64) -> Self {
        self.policy = RetryPolicy::new(retries, retry_delay_ms);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[instrument(name = "ZipDownload", skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        debug!("Requesting archive from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()?;
        let (status, bytes) = with_retry(
            || async {
                let response = client.get(&self.url).send().await?;
                let status = response.status();
                Ok::<_, reqwest::Error>((status, response.bytes().await?))
            },
            self.policy,
        )
        .await
        .with_context(|| format!("Failed to download {}", self.url))?;

        if status != StatusCode::OK {
            bail!("HTTP error {}", status.as_u16());
        }

        info!(
            "File successfully downloaded: {} ({} bytes)",
            self.url,
            bytes.len()
        );
        Ok(bytes.to_vec())
    }
}
