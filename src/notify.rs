// src/notify.rs

//! Notification collaborator seam.
//!
//! Message formatting, chunking and delivery belong to the implementation
//! behind [`ListingNotifier`]; the pipeline only hands over one persisted
//! listing and its photo URLs at a time.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StoredListing;

/// Consumer of newly discovered listings.
#[async_trait]
pub trait ListingNotifier: Send + Sync {
    /// Announce one new listing together with its ordered photo URLs.
    async fn notify(&self, listing: &StoredListing, photos: &[String]) -> Result<()>;
}

/// Notifier that writes to the log. Stands in wherever no delivery channel
/// is wired up.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl ListingNotifier for LogNotifier {
    async fn notify(&self, listing: &StoredListing, photos: &[String]) -> Result<()> {
        log::info!(
            "New listing in '{}': {}eur {}r {}m2 floor {}/{} {} ({} photos) {}",
            listing.region,
            listing.price,
            listing.rooms,
            listing.area,
            listing.floor,
            listing.max_floor,
            listing.series,
            photos.len(),
            listing.url,
        );
        Ok(())
    }
}
