//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use boxdline_core::config::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_ENRICH_CONCURRENCY, DEFAULT_PAGE_CEILING,
};
use boxdline_core::{EngineConfig, HttpConfig};
use serde::Deserialize;

/// Global configuration for boxdline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub letterboxd: LetterboxdConfig,
    pub http: HttpSection,
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LetterboxdConfig {
    #[serde(deserialize_with = "deserialize_env_string")]
    pub base_url: String,
    /// Fetch film pages for IMDb/TMDb ids
    pub details: bool,
}

impl Default for LetterboxdConfig {
    fn default() -> Self {
        Self {
            base_url: boxdline_letterboxd::config::DEFAULT_BASE_URL.to_string(),
            details: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSection {
    #[serde(deserialize_with = "deserialize_env_var")]
    pub user_agent: Option<String>,
    /// Seconds
    pub connect_timeout: u64,
    /// Seconds
    pub request_timeout: u64,
}

impl Default for HttpSection {
    fn default() -> Self {
        let http = HttpConfig::default();
        Self {
            user_agent: None,
            connect_timeout: http.connect_timeout.as_secs(),
            request_timeout: http.request_timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub enrich_concurrency: usize,
    pub page_ceiling: u32,
    pub channel_capacity: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            page_ceiling: DEFAULT_PAGE_CEILING,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Like [`deserialize_env_var`], but an unset variable is an error
fn deserialize_env_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    expand_env_var(&s).ok_or_else(|| serde::de::Error::custom(format!("{s} is not set")))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./boxdline.toml (current directory)
    /// 2. ~/.config/boxdline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("boxdline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "boxdline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Client configuration for these settings
    pub fn client_config(&self) -> boxdline_letterboxd::Config {
        let mut http = HttpConfig {
            connect_timeout: Duration::from_secs(self.http.connect_timeout),
            request_timeout: Duration::from_secs(self.http.request_timeout),
            ..Default::default()
        };
        if let Some(agent) = &self.http.user_agent {
            http.user_agent = agent.clone();
        }
        let engine = EngineConfig {
            enrich_concurrency: self.engine.enrich_concurrency,
            page_ceiling: self.engine.page_ceiling,
            channel_capacity: self.engine.channel_capacity,
            http,
            ..EngineConfig::with_base_url(&self.letterboxd.base_url)
        };
        boxdline_letterboxd::Config {
            engine,
            enrich: self.letterboxd.details,
        }
    }
}
