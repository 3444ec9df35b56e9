// src/registry.rs

//! In-memory registry of listings discovered during one crawl.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::models::Listing;

/// Concurrent-safe `id -> Listing` container scoped to a single crawl.
///
/// Upserts are last-write-wins per id. The registry is the only structure
/// mutated by concurrently completing fetch results, so all methods take
/// `&self` and synchronize internally.
#[derive(Debug, Default)]
pub struct ListingRegistry {
    map: RwLock<HashMap<String, Listing>>,
}

impl ListingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the listing under its derived id.
    pub fn upsert(&self, listing: Listing) {
        let id = listing.id();
        self.map
            .write()
            .expect("registry lock poisoned")
            .insert(id, listing);
    }

    /// True when a listing with this id has been discovered.
    pub fn contains(&self, id: &str) -> bool {
        self.map
            .read()
            .expect("registry lock poisoned")
            .contains_key(id)
    }

    /// Fetch a copy of one listing.
    pub fn get(&self, id: &str) -> Option<Listing> {
        self.map
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.map.read().expect("registry lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of all discovered listings, in no particular order.
    pub fn snapshot(&self) -> Vec<Listing> {
        self.map
            .read()
            .expect("registry lock poisoned")
            .values()
            .cloned()
            .collect()
    }

    /// Display view: listings partitioned by region.
    ///
    /// Regions are ordered ascending case-insensitively; listings within a
    /// region are ordered by ascending price.
    pub fn by_region(&self) -> Vec<(String, Vec<Listing>)> {
        let mut groups: HashMap<String, Vec<Listing>> = HashMap::new();
        for listing in self.snapshot() {
            groups.entry(listing.region.clone()).or_default().push(listing);
        }

        let mut regions: Vec<(String, Vec<Listing>)> = groups.into_iter().collect();
        regions.sort_by(|a, b| a.0.to_lowercase().cmp(&b.0.to_lowercase()));
        for (_, listings) in &mut regions {
            listings.sort_by(|a, b| a.price.total_cmp(&b.price));
        }
        regions
    }
}
