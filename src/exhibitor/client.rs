//! HTTP client for the exhibitor search API.

use super::error::FetchError;
use super::models::PageRequest;
use super::retry::{retry_with_backoff, RetryPolicy};
use crate::config::Config;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

/// Trait for page fetching - enables mocking for tests.
#[async_trait]
pub trait ExhibitorSearch: Send + Sync {
    /// Fetches one search page and returns the parsed JSON body.
    async fn fetch_page(&self, page_number: u32) -> Result<Value, FetchError>;
}

/// Exhibitor search client with static headers and transient-error retry.
pub struct ExhibitorClient {
    client: Client,
    url: String,
    request: PageRequest,
    headers: Vec<(&'static str, String)>,
    policy: RetryPolicy,
}

impl ExhibitorClient {
    /// Creates a new client for the configured endpoint.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_base_url(config, None)
    }

    /// Creates a new client with an optional endpoint override (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(config.timeout())
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            url: base_url.unwrap_or_else(|| config.api_url.clone()),
            request: PageRequest::from_config(config, config.start_page),
            headers: build_headers(config),
            policy: RetryPolicy::new(config.max_retries, Duration::from_millis(config.backoff_ms)),
        })
    }

    /// Full request URL for a page.
    fn page_url(&self, page_number: u32) -> String {
        format!("{}?{}", self.url, self.request.with_page(page_number).query_string())
    }

    /// One GET without retry; error statuses become [`FetchError::Status`].
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let mut request = self.client.get(url);
        for (name, value) in &self.headers {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16(), body });
        }

        Ok(body)
    }
}

#[async_trait]
impl ExhibitorSearch for ExhibitorClient {
    async fn fetch_page(&self, page_number: u32) -> Result<Value, FetchError> {
        let url = self.page_url(page_number);

        info!("Fetching page {}", page_number);
        let body = retry_with_backoff(self.policy, || self.get(&url), tokio::time::sleep).await?;

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { page: page_number, source })
    }
}

/// Static request headers; nothing here depends on responses.
fn build_headers(config: &Config) -> Vec<(&'static str, String)> {
    vec![
        ("accept", "application/json, text/plain, */*".to_string()),
        ("apikey", config.api_key.clone()),
        ("user-agent", config.user_agent.clone()),
        ("origin", config.origin.clone()),
        ("referer", config.referer.clone()),
    ]
}
