// src/models/config.rs

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.search_url.trim().is_empty() {
            return Err(AppError::validation("crawler.search_url is empty"));
        }
        if !self.crawler.search_url.ends_with('/') {
            return Err(AppError::validation(
                "crawler.search_url must end with '/' so page paths can be appended",
            ));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.batch_size == 0 {
            return Err(AppError::validation("crawler.batch_size must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the paginated search results, with a trailing slash
    #[serde(default = "defaults::search_url")]
    pub search_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Pages fetched concurrently per batch; also the in-flight fetch bound
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Delay between page batches in milliseconds
    #[serde(default = "defaults::batch_delay")]
    pub batch_delay_ms: u64,

    /// Maximum photo URLs collected per listing detail page
    #[serde(default = "defaults::max_photos")]
    pub max_photos: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::search_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            batch_size: defaults::batch_size(),
            batch_delay_ms: defaults::batch_delay(),
            max_photos: defaults::max_photos(),
        }
    }
}

mod defaults {
    pub fn search_url() -> String {
        "https://www.ss.lv/en/real-estate/flats/riga/all/hand_over/".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn batch_size() -> usize {
        10
    }
    pub fn batch_delay() -> u64 {
        100
    }
    pub fn max_photos() -> usize {
        8
    }
}
