//! Page fetching over HTTP.
//!
//! The engine only sees the [`PageFetcher`] trait; [`HttpFetcher`] is the
//! reqwest-backed implementation used outside of tests.

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::error::CollectError;

/// Fetch the raw body behind an absolute address.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, address: &str) -> Result<String, CollectError>;
}

/// Async HTTP client with connection pooling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, CollectError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| CollectError::from_reqwest(&e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, address: &str) -> Result<String, CollectError> {
        let response = self.client.get(address).send().await.map_err(|e| {
            log::warn!("Error sending request to {address}: {e}");
            CollectError::from_reqwest(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("{address}: HTTP {}", status.as_u16());
            return Err(CollectError::from_status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| CollectError::from_reqwest(&e))
    }
}
