// src/pipeline/sync.rs

//! One full synchronization run: crawl → reconcile → notify.

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::models::{CrawlerConfig, ListingFilter};
use crate::notify::ListingNotifier;
use crate::pipeline::Reconciler;
use crate::services::crawler::ListingCrawler;
use crate::services::fetcher::PageSource;
use crate::storage::ListingStore;

/// Summary of a sync run.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    /// Listings discovered by the crawl (after filtering)
    pub discovered: usize,
    /// Listings inserted into the store this run
    pub new_listings: usize,
    /// New listings whose notification failed
    pub notify_failures: usize,
}

/// Crawl the site, reconcile against the store and notify about every
/// newly-inserted listing.
///
/// Photo fetching and notification failures are logged per listing and do
/// not abort the run; crawl and reconciliation failures propagate.
pub async fn run_sync(
    source: &dyn PageSource,
    store: &dyn ListingStore,
    notifier: &dyn ListingNotifier,
    config: &CrawlerConfig,
    filter: &ListingFilter,
    cancel: &CancellationToken,
) -> Result<SyncOutcome> {
    log::info!("Fetching listings, filter: {filter:?}");
    let crawler = ListingCrawler::new(source, config.clone());
    let registry = crawler.fetch_all(filter, cancel).await?;
    log::info!("Crawl finished with {} listings", registry.len());

    let discovered = registry.snapshot();
    let new_listings = Reconciler::new(store).reconcile(&discovered).await?;
    log::info!("{} listings are new", new_listings.len());

    let mut outcome = SyncOutcome {
        discovered: discovered.len(),
        new_listings: new_listings.len(),
        notify_failures: 0,
    };

    for (region, listings) in &new_listings.by_region {
        log::info!("Processing region '{region}': {} new listings", listings.len());

        for entity in listings {
            if cancel.is_cancelled() {
                return Err(AppError::Cancelled);
            }

            let photos = match source.fetch_photos(&entity.url).await {
                Ok(photos) => photos,
                Err(error) => {
                    log::warn!("Fetching photos for '{}' failed: {error}", entity.id);
                    Vec::new()
                }
            };

            if let Err(error) = notifier.notify(entity, &photos).await {
                outcome.notify_failures += 1;
                log::error!("Notifying about '{}' failed: {error}", entity.id);
            }
        }
    }

    Ok(outcome)
}
