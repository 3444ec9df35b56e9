// src/services/crawler.rs

//! Pagination controller.
//!
//! Drives fetch → parse → filter → registry-insert across a result set of
//! unknown length. The site serves page 1 again for out-of-range page
//! indexes, so the controller fingerprints page 1 and stops as soon as a
//! later page repeats it. Over-fetching past the true end of the results is
//! accepted; in exchange every batch is evaluated in ascending page order and
//! the stop conditions are deterministic.

use std::sync::Arc;
use std::time::Duration;

use futures::future;
use sha2::{Digest, Sha256};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, Listing, ListingFilter};
use crate::registry::ListingRegistry;
use crate::services::fetcher::PageSource;

/// Order-sensitive fingerprint of one page's record sequence.
///
/// Two pages fingerprint equal exactly when they contain identical records in
/// identical order.
pub fn page_fingerprint(listings: &[Listing]) -> [u8; 32] {
    let mut hasher = Sha256::new();

    for listing in listings {
        for field in [
            &listing.region,
            &listing.rooms,
            &listing.area,
            &listing.floor,
            &listing.series,
            &listing.link,
        ] {
            hasher.update(field.as_bytes());
            hasher.update([0x1f]);
        }
        hasher.update(listing.price.to_le_bytes());
        hasher.update([0x1e]);
    }

    hasher.finalize().into()
}

/// One crawl over the paginated search results.
///
/// The crawler holds no state between runs; create one per crawl and hand it
/// a cancellation token owned by the caller.
pub struct ListingCrawler<'a> {
    source: &'a dyn PageSource,
    config: CrawlerConfig,
}

impl<'a> ListingCrawler<'a> {
    pub fn new(source: &'a dyn PageSource, config: CrawlerConfig) -> Self {
        Self { source, config }
    }

    /// Crawl every result page, returning the registry of listings that
    /// survived the filter.
    ///
    /// Page 1 is fetched synchronously; a failed or empty page 1 ends the
    /// crawl with an empty registry. Later pages are fetched in fixed-size
    /// concurrent batches and evaluated strictly in ascending page order:
    /// a failed page is skipped, an empty page or a page repeating page 1
    /// stops the crawl. Cancellation discards the partial registry and
    /// returns [`AppError::Cancelled`].
    pub async fn fetch_all(
        &self,
        filter: &ListingFilter,
        cancel: &CancellationToken,
    ) -> Result<ListingRegistry> {
        let registry = ListingRegistry::new();

        log::info!("Fetching page 1");
        let first_page = match self.source.fetch_page(1).await {
            Some(listings) if !listings.is_empty() => listings,
            Some(_) => {
                log::info!("Page 1 has no listings, finishing");
                return Ok(registry);
            }
            None => {
                log::warn!("Page 1 failed, finishing");
                return Ok(registry);
            }
        };

        let first_fingerprint = page_fingerprint(&first_page);
        log::debug!("Page 1 fingerprint {}", hex::encode(first_fingerprint));
        insert_matching(&registry, first_page, filter);

        let batch_size = self.config.batch_size.max(1);
        let gate = Arc::new(Semaphore::new(batch_size));
        let mut batch_start: u32 = 2;

        'crawl: loop {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let fetches = (batch_start..batch_start + batch_size as u32).map(|page| {
                let gate = Arc::clone(&gate);
                async move {
                    let _permit = gate.acquire_owned().await.expect("admission gate closed");
                    (page, self.source.fetch_page(page).await)
                }
            });

            // join_all yields results in submission order, so the batch is
            // evaluated by ascending page index regardless of completion
            // order.
            let results = tokio::select! {
                _ = cancel.cancelled() => return Err(AppError::Cancelled),
                results = future::join_all(fetches) => results,
            };

            for (page, outcome) in results {
                if cancel.is_cancelled() {
                    return Err(AppError::Cancelled);
                }

                match outcome {
                    None => {
                        log::warn!("Page {page} failed, skipping");
                    }
                    Some(listings) if listings.is_empty() => {
                        log::info!("Page {page} has no listings, finishing");
                        break 'crawl;
                    }
                    Some(listings) if page_fingerprint(&listings) == first_fingerprint => {
                        log::info!("Page {page} repeats page 1, finishing");
                        break 'crawl;
                    }
                    Some(listings) => insert_matching(&registry, listings, filter),
                }
            }

            batch_start += batch_size as u32;

            if self.config.batch_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.batch_delay_ms)).await;
            }
        }

        Ok(registry)
    }
}

fn insert_matching(registry: &ListingRegistry, listings: Vec<Listing>, filter: &ListingFilter) {
    for listing in listings {
        if filter.matches(&listing) {
            registry.upsert(listing);
        }
    }
}
