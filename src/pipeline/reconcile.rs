// src/pipeline/reconcile.rs

//! Reconciliation of a crawl result against the persisted store.
//!
//! One run is one transaction: discovered listings are inserted or updated,
//! persisted listings absent from the crawl are deleted, and everything
//! commits together. Only newly-inserted listings are reported, so a price
//! or text change never re-notifies an already-known advertisement.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Listing, StoredListing};
use crate::storage::{ListingStore, StoreTx};

/// Newly-inserted listings of one reconciliation run, grouped by region.
#[derive(Debug, Clone, Default)]
pub struct NewListings {
    pub by_region: BTreeMap<String, Vec<StoredListing>>,
}

impl NewListings {
    fn from_entities(entities: Vec<StoredListing>) -> Self {
        let mut by_region: BTreeMap<String, Vec<StoredListing>> = BTreeMap::new();
        for entity in entities {
            by_region.entry(entity.region.clone()).or_default().push(entity);
        }
        Self { by_region }
    }

    /// Total number of new listings across all regions.
    pub fn len(&self) -> usize {
        self.by_region.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }
}

/// Applies one crawl's discovered set to the persisted store.
pub struct Reconciler<'a> {
    store: &'a dyn ListingStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn ListingStore) -> Self {
        Self { store }
    }

    /// Diff `discovered` against the store and apply adds, updates and
    /// deletes in a single transaction.
    ///
    /// Any error during the apply or the commit rolls back the whole run and
    /// propagates to the caller.
    pub async fn reconcile(&self, discovered: &[Listing]) -> Result<NewListings> {
        let mut tx = self.store.begin().await?;

        match apply(tx.as_mut(), discovered).await {
            Ok(inserted) => {
                tx.commit()
                    .await
                    .map_err(|e| AppError::store("commit", e))?;
                Ok(NewListings::from_entities(inserted))
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    log::error!("Rollback failed: {rollback_error}");
                }
                Err(AppError::store("reconcile", error))
            }
        }
    }
}

async fn apply(tx: &mut dyn StoreTx, discovered: &[Listing]) -> Result<Vec<StoredListing>> {
    let now = Utc::now();
    let mut inserted = Vec::new();
    let mut discovered_ids: HashSet<String> = HashSet::new();

    for listing in discovered {
        let incoming = StoredListing::from_listing(listing, now);
        if incoming.id.is_empty() {
            log::warn!("Skipping listing without a stable id: {listing}");
            continue;
        }
        discovered_ids.insert(incoming.id.clone());

        match tx.get(&incoming.id).await? {
            Some(mut existing) => {
                existing.apply_update(&incoming, now);
                tx.update(existing).await?;
                log::debug!("Updated listing {}", incoming.id);
            }
            None => {
                tx.insert(incoming.clone()).await?;
                log::info!("Added new listing {}", incoming.id);
                inserted.push(incoming);
            }
        }
    }

    let stale: Vec<String> = tx
        .get_all()
        .await?
        .into_iter()
        .filter(|entity| !discovered_ids.contains(&entity.id))
        .map(|entity| entity.id)
        .collect();

    if !stale.is_empty() {
        log::info!("Deleting {} listings gone from the site", stale.len());
    }
    for id in stale {
        tx.delete(&id).await?;
    }

    Ok(inserted)
}
