//! Letterboxd client configuration

use boxdline_core::EngineConfig;

pub const DEFAULT_BASE_URL: &str = "https://letterboxd.com";

/// Runtime configuration for [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    /// Engine settings; `engine.base_url` defaults to letterboxd.com
    pub engine: EngineConfig,
    /// Fetch every film page for its external ids
    pub enrich: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::with_base_url(DEFAULT_BASE_URL),
            enrich: true,
        }
    }
}

impl Config {
    /// Point at another host, keeping every other default
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            engine: EngineConfig::with_base_url(base_url),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.engine.base_url, "https://letterboxd.com");
        assert_eq!(config.engine.page_ceiling, 50);
        assert!(config.enrich);
    }

    #[test]
    fn custom_base_url() {
        let config = Config::with_base_url("http://127.0.0.1:8080/");
        assert_eq!(config.engine.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.engine.enrich_concurrency, 5);
    }
}
