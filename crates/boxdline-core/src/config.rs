//! Engine configuration, passed explicitly to every collector

use std::time::Duration;

/// Default number of in-flight detail fetches per enrichment call
pub const DEFAULT_ENRICH_CONCURRENCY: usize = 5;

/// Hard ceiling on page numbers; anything beyond means a runaway loop
pub const DEFAULT_PAGE_CEILING: u32 = 50;

/// Default capacity of the record channel handed to stream consumers
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// HTTP client settings for [`HttpFetcher`](crate::fetch::HttpFetcher)
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub connect_timeout: Duration,
    /// Whole-request timeout. The only timeout applied anywhere in the engine.
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "boxdline".to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Runtime configuration for a [`Collector`](crate::paginator::Collector)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Prefix for every page and detail address (no trailing slash)
    pub base_url: String,
    pub enrich_concurrency: usize,
    pub page_ceiling: u32,
    pub channel_capacity: usize,
    pub http: HttpConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            page_ceiling: DEFAULT_PAGE_CEILING,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            http: HttpConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Join the base URL with a site-relative path
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.enrich_concurrency, 5);
        assert_eq!(config.page_ceiling, 50);
        assert!(config.channel_capacity > 0);
        assert_eq!(config.http.user_agent, "boxdline");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let config = EngineConfig::with_base_url("https://letterboxd.com/");
        assert_eq!(config.base_url, "https://letterboxd.com");
        assert_eq!(
            config.url_for("/film/sweetback/"),
            "https://letterboxd.com/film/sweetback/"
        );
        assert_eq!(config.url_for("dave"), "https://letterboxd.com/dave");
    }
}
