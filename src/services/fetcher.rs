// src/services/fetcher.rs

//! Page fetching over HTTP.
//!
//! [`PageSource`] is the seam between the pagination controller and the
//! network; [`PageFetcher`] is the reqwest-backed implementation. A failed
//! fetch is a logged `None`, never an error, so one bad page cannot abort a
//! crawl.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, Listing};
use crate::services::parser;

/// Source of parsed result pages and detail-page photos.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch and parse one result page by index (1-based).
    ///
    /// Returns `None` on a non-success transport outcome; the failure is
    /// logged here rather than raised.
    async fn fetch_page(&self, page: u32) -> Option<Vec<Listing>>;

    /// Fetch the ordered photo URLs from a listing's detail page.
    async fn fetch_photos(&self, url: &str) -> Result<Vec<String>>;
}

/// HTTP fetcher for the paginated search results.
pub struct PageFetcher {
    client: Client,
    config: CrawlerConfig,
}

impl PageFetcher {
    /// Create a fetcher with a configured HTTP client.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// URL of a result page. Page 1 is `page1.html`, like every other page.
    fn page_url(&self, page: u32) -> String {
        format!("{}page{}.html", self.config.search_url, page)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, page: u32) -> Option<Vec<Listing>> {
        let url = self.page_url(page);

        let html = match self.get_text(&url).await {
            Ok(html) => html,
            Err(error) => {
                log::warn!("Fetching page {page} failed ({url}): {error}");
                return None;
            }
        };

        // Document parsing is CPU work; keep it off the scheduler threads.
        let base_url = self.config.search_url.clone();
        match tokio::task::spawn_blocking(move || parser::parse_listings(&html, &base_url)).await {
            Ok(listings) => Some(listings),
            Err(error) => {
                log::warn!("Parsing page {page} failed: {error}");
                None
            }
        }
    }

    async fn fetch_photos(&self, url: &str) -> Result<Vec<String>> {
        let html = self.get_text(url).await?;

        let mut photos = tokio::task::spawn_blocking(move || parser::parse_photos(&html))
            .await
            .map_err(|e| AppError::crawl("fetch_photos", e))?;

        photos.truncate(self.config.max_photos);
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let fetcher = PageFetcher::new(&CrawlerConfig::default()).unwrap();
        assert_eq!(
            fetcher.page_url(1),
            "https://www.ss.lv/en/real-estate/flats/riga/all/hand_over/page1.html"
        );
        assert_eq!(
            fetcher.page_url(17),
            "https://www.ss.lv/en/real-estate/flats/riga/all/hand_over/page17.html"
        );
    }
}
