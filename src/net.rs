use crate::config::Config;
use crate::error::ScrapeError;

use log::warn;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Source of response bodies for the pipeline
pub trait Fetch {
    /// Returns the body at `url`, or fails once the transport gives up
    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError>;
}

/// Capped exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: Duration,
    pub backoff_max: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor(),
            backoff_max: config.backoff_max(),
        }
    }

    /// Sleep before retry number `retry` (1-based)
    pub fn delay(&self, retry: u32) -> Duration {
        let multiplier = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(self.backoff_max)
    }
}

/// Parses `base` and appends `params` as the query string
pub fn endpoint(base: &str, params: &[(&str, &str)]) -> Result<Url, ScrapeError> {
    Url::parse_with_params(base, params).map_err(|source| ScrapeError::Url {
        url: base.to_string(),
        source,
    })
}

/// Statuses worth another attempt; everything else goes back to the caller
fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Builds the default headers for the client.
fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::USER_AGENT,
        HeaderValue::from_static(concat!("watch_catalog/", env!("CARGO_PKG_VERSION"))),
    );
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers
}

/// One shared `reqwest` client plus the retry policy applied to every request
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(policy: RetryPolicy) -> reqwest::Result<Self> {
        let client = Client::builder().default_headers(build_headers()).build()?;
        Ok(Self { client, policy })
    }
}

impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &Url) -> Result<String, ScrapeError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let reason = match self.client.get(url.clone()).send().await {
                Ok(response) if is_retryable(response.status()) => {
                    format!("HTTP {}", response.status())
                }
                Ok(response) => match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => e.to_string(),
                },
                Err(e) => e.to_string(),
            };

            if attempt > self.policy.max_retries {
                return Err(ScrapeError::Transport {
                    url: url.to_string(),
                    attempts: attempt,
                    reason,
                });
            }

            let delay = self.policy.delay(attempt);
            warn!(
                "Request to {} failed ({}), retry {}/{} in {:?}",
                url, reason, attempt, self.policy.max_retries, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
